//! Default values for maven-compose configuration.
//!
//! This module provides centralized default values used across the engine
//! and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Property key prefixes that declare a fragment
pub const DEFAULT_PROPERTY_PREFIXES: [&str; 2] = ["maven-compose.", "maven.compose."];

/// File name of a descriptor inside a module directory
pub const DEFAULT_DESCRIPTOR_FILE_NAME: &str = "pom.yaml";

/// Maximum length of a fragment ancestor chain
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = ".maven-compose.yaml";

/// Returns the default artifact repository root.
///
/// Uses `~/.maven-compose/repository`, falling back to
/// `.maven-compose/repository` in the current directory if the home
/// directory cannot be determined.
///
/// This can be overridden by the `repository` configuration key, the
/// `--repository` CLI flag or the `MAVEN_COMPOSE_REPOSITORY` environment
/// variable.
pub fn default_repository_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".maven-compose")
        .join("repository")
}

/// Owned copy of [`DEFAULT_PROPERTY_PREFIXES`]
pub fn default_property_prefixes() -> Vec<String> {
    DEFAULT_PROPERTY_PREFIXES
        .iter()
        .map(|prefix| prefix.to_string())
        .collect()
}
