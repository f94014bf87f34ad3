//! # Fragments Command Implementation
//!
//! This module implements the `fragments` subcommand, which lists the fragment
//! declarations of a descriptor in the order they would be merged. Fragments
//! are not resolved, so the command also works offline.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::EngineArgs;
use maven_compose::builder::BuildRequest;
use maven_compose::output::OutputConfig;
use maven_compose::phases::Declaration;

/// List the fragment declarations of a descriptor
#[derive(Args, Debug)]
pub struct FragmentsArgs {
    /// Descriptor file to inspect.
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute the `fragments` command.
pub fn execute(args: FragmentsArgs, output: &OutputConfig) -> Result<()> {
    let engine = args.engine.engine()?;
    let declarations = engine.declarations(&BuildRequest::for_file(&args.descriptor))?;

    if declarations.is_empty() {
        println!("No fragments declared in {}", args.descriptor.display());
        return Ok(());
    }
    for declaration in &declarations {
        println!("{}", format_declaration(declaration, output));
    }
    Ok(())
}

fn format_declaration(declaration: &Declaration, output: &OutputConfig) -> String {
    let mut line = format!(
        "{} = {}",
        output.header(&declaration.property),
        declaration.reference.coordinate
    );
    if let Some(location) = &declaration.reference.location {
        line.push_str(&format!(" {}", output.detail(&format!("@ {}", location.display()))));
    }
    line
}
