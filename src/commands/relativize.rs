//! # Relativize Command Implementation
//!
//! Prints the path of a target relative to an anchor directory, the same
//! computation the substitute-parent strategy uses for `relativePath`. Both
//! paths are taken literally; the filesystem is never consulted.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use maven_compose::path::relativize_path;

/// Print the path of a target relative to an anchor directory
#[derive(Args, Debug)]
pub struct RelativizeArgs {
    /// Absolute path to express relatively.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Absolute directory the result is relative to.
    #[arg(value_name = "ANCHOR")]
    pub anchor: PathBuf,
}

/// Execute the `relativize` command.
pub fn execute(args: RelativizeArgs) -> Result<()> {
    println!("{}", relativize_path(&args.target, &args.anchor));
    Ok(())
}
