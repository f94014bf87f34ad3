//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `maven-compose` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Commands that run the engine flatten [`EngineArgs`] into their arguments
//! so that configuration is located and overridden the same way everywhere.

pub mod build;
pub mod fragments;
pub mod relativize;
pub mod tree;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use maven_compose::config::{self, ComposeConfig, MergeStrategy};
use maven_compose::defaults::CONFIG_FILE_NAME;
use maven_compose::phases::orchestrator::CompositeBuilder;

/// Options shared by every command that runs the engine
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Path to the configuration file.
    ///
    /// Defaults to `.maven-compose.yaml` in the current directory, when present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The root directory of the artifact repository.
    ///
    /// Defaults to `~/.maven-compose/repository`.
    /// Can also be set with the `MAVEN_COMPOSE_REPOSITORY` environment variable.
    #[arg(long, value_name = "DIR", env = "MAVEN_COMPOSE_REPOSITORY")]
    pub repository: Option<PathBuf>,

    /// Merge strategy, overriding the configuration file.
    ///
    /// Either `direct` or `substitute-parent`.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<MergeStrategy>,
}

impl EngineArgs {
    /// Load the configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<ComposeConfig> {
        let mut compose_config = match &self.config {
            Some(path) => config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                let default_path = PathBuf::from(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    debug!("Using configuration {}", default_path.display());
                    config::from_file(&default_path)
                        .with_context(|| format!("Failed to load config from {}", default_path.display()))?
                } else {
                    ComposeConfig::default()
                }
            }
        };

        if let Some(repository) = &self.repository {
            compose_config.repository = Some(repository.clone());
        }
        if let Some(strategy) = self.strategy {
            compose_config.strategy = strategy;
        }
        Ok(compose_config)
    }

    /// Engine over the reference collaborators
    pub fn engine(&self) -> Result<CompositeBuilder> {
        Ok(CompositeBuilder::from_config(self.load_config()?))
    }
}
