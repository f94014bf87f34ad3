//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::commands;
use maven_compose::output::OutputConfig;

/// Maven Compose - Multiple inheritance for build descriptors
#[derive(Parser, Debug)]
#[command(name = "maven-compose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose descriptors and print their effective form
    Build(commands::build::BuildArgs),

    /// List the fragment declarations of a descriptor
    Fragments(commands::fragments::FragmentsArgs),

    /// Display the fragment graph of a descriptor
    Tree(commands::tree::TreeArgs),

    /// Print the path of a target relative to an anchor directory
    Relativize(commands::relativize::RelativizeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG takes precedence over --log-level
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or(self.log_level.as_str()))
            .format_timestamp(None)
            .try_init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Build(args) => commands::build::execute(args, &output),
            Commands::Fragments(args) => commands::fragments::execute(args, &output),
            Commands::Tree(args) => commands::tree::execute(args, &output),
            Commands::Relativize(args) => commands::relativize::execute(args),
        }
    }
}
