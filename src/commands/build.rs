//! # Build Command Implementation
//!
//! This module implements the `build` subcommand, which composes one or more
//! descriptors and prints their effective form.
//!
//! ## Functionality
//!
//! - **Composition**: Every declared fragment is resolved, built and merged.
//! - **Parallel Builds**: Several descriptors are built in parallel, sharing
//!   the engine's caches so common fragments are built once.
//! - **Output Formats**: YAML (one document per descriptor) or JSON (a single
//!   object, or an array for several descriptors).
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use super::EngineArgs;
use maven_compose::builder::BuildRequest;
use maven_compose::descriptor::BuildDescriptor;
use maven_compose::output::{OutputConfig, OutputFormat};

/// Compose descriptors and print their effective form
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Descriptor files to build.
    #[arg(value_name = "DESCRIPTOR", required = true)]
    pub descriptors: Vec<PathBuf>,

    /// Output format: `yaml` or `json`.
    #[arg(short, long, value_name = "FORMAT", default_value = "yaml")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute the `build` command.
///
/// All descriptors are built before anything is printed. If any of them
/// fails, every failure is reported on stderr and nothing is printed.
pub fn execute(args: BuildArgs, output: &OutputConfig) -> Result<()> {
    let engine = args.engine.engine()?;
    let requests: Vec<BuildRequest> = args.descriptors.iter().map(BuildRequest::for_file).collect();

    let results = engine.build_all(&requests);

    let mut descriptors = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (path, result) in args.descriptors.iter().zip(results) {
        match result {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", output.header("error:"), path.display(), e);
            }
        }
    }
    if failures > 0 {
        return Err(anyhow!(
            "{} of {} descriptor(s) failed to build",
            failures,
            args.descriptors.len()
        ));
    }

    print!("{}", render(&args.descriptors, &descriptors, args.format)?);
    Ok(())
}

fn render(paths: &[PathBuf], descriptors: &[BuildDescriptor], format: OutputFormat) -> Result<String> {
    match (format, descriptors) {
        (_, [single]) => {
            let mut rendered = format.render(single)?;
            if !rendered.ends_with('\n') {
                rendered.push('\n');
            }
            Ok(rendered)
        }
        (OutputFormat::Json, many) => Ok(format!("{}\n", serde_json::to_string_pretty(many)?)),
        (OutputFormat::Yaml, many) => {
            let mut rendered = String::new();
            for (path, descriptor) in paths.iter().zip(many) {
                rendered.push_str(&format!("--- # {}\n", path.display()));
                rendered.push_str(&format.render(descriptor)?);
            }
            Ok(rendered)
        }
    }
}
