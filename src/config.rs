//! # Configuration
//!
//! This module defines `ComposeConfig`, the settings of a composite assembly
//! run, and the logic for reading it from a `.maven-compose.yaml` file. Every
//! key is optional; an empty file (or no file at all) yields the defaults.
//!
//! ```yaml
//! property-prefixes: ["maven-compose.", "maven.compose."]
//! strategy: direct            # or substitute-parent
//! validate-local-overrides: true
//! max-depth: 32
//! descriptor-file-name: pom.yaml
//! repository: /opt/fragments
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::{default_property_prefixes, DEFAULT_DESCRIPTOR_FILE_NAME, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};

/// How a fragment is merged onto the requesting descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Apply the inheritance merge rules with the fragment as parent
    #[default]
    Direct,
    /// Rebuild the descriptor through the wrapped builder with the fragment
    /// temporarily installed as its parent
    SubstituteParent,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Direct => write!(f, "direct"),
            MergeStrategy::SubstituteParent => write!(f, "substitute-parent"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "direct" => Ok(MergeStrategy::Direct),
            "substitute-parent" => Ok(MergeStrategy::SubstituteParent),
            other => Err(Error::ConfigParse {
                message: format!("unknown merge strategy '{}'", other),
                hint: Some("use 'direct' or 'substitute-parent'".to_string()),
            }),
        }
    }
}

/// Settings of a composite assembly run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Property key prefixes that declare a fragment
    pub property_prefixes: Vec<String>,
    /// Merge strategy
    pub strategy: MergeStrategy,
    /// Check that a local override directory holds the declared artifact
    pub validate_local_overrides: bool,
    /// Maximum length of a fragment ancestor chain
    pub max_depth: usize,
    /// Descriptor file name looked up inside directories
    pub descriptor_file_name: String,
    /// Artifact repository root (defaults to `~/.maven-compose/repository`)
    pub repository: Option<PathBuf>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            property_prefixes: default_property_prefixes(),
            strategy: MergeStrategy::default(),
            validate_local_overrides: true,
            max_depth: DEFAULT_MAX_DEPTH,
            descriptor_file_name: DEFAULT_DESCRIPTOR_FILE_NAME.to_string(),
            repository: None,
        }
    }
}

impl ComposeConfig {
    fn validate(&self) -> Result<()> {
        if self.property_prefixes.is_empty() {
            return Err(Error::ConfigParse {
                message: "property-prefixes must not be empty".to_string(),
                hint: Some("remove the key to use the default prefixes".to_string()),
            });
        }
        if self.property_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::ConfigParse {
                message: "property-prefixes must not contain an empty prefix".to_string(),
                hint: Some("an empty prefix would declare every property as a fragment".to_string()),
            });
        }
        if self.max_depth == 0 {
            return Err(Error::ConfigParse {
                message: "max-depth must be at least 1".to_string(),
                hint: None,
            });
        }
        if self.descriptor_file_name.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "descriptor-file-name must not be empty".to_string(),
                hint: None,
            });
        }
        Ok(())
    }
}

/// Parse a configuration from YAML
pub fn parse(yaml_content: &str) -> Result<ComposeConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(ComposeConfig::default());
    }

    let config: Option<ComposeConfig> =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?;
    // A file holding only comments deserializes to `None`
    let config = config.unwrap_or_default();
    config.validate()?;
    Ok(config)
}

/// Parse a configuration from a file
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<ComposeConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
