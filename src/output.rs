//! # Output Configuration
//!
//! This module controls how the CLI presents effective descriptors and
//! fragment listings: the document format (YAML or JSON) and whether headers
//! and markers are coloured.
//!
//! ## Respecting User Preferences
//!
//! Colour follows the `--color=never|always|auto` flag. In auto mode the
//! following environment variables are honoured:
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Colour never leaks into rendered documents, only into the lines around them.

use std::env;
use std::fmt;
use std::str::FromStr;

use console::style;

use crate::descriptor::BuildDescriptor;
use crate::error::{Error, Result};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never" or "auto".
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Format a section header, bold cyan when colours are on
    pub fn header(&self, text: &str) -> String {
        if self.use_color {
            style(text).cyan().bold().force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }

    /// Format a secondary detail such as a file path, dimmed when colours are on
    pub fn detail(&self, text: &str) -> String {
        if self.use_color {
            style(text).dim().force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Document format of an effective descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Serialization {
                message: format!("unsupported output format '{}'", other),
            }),
        }
    }
}

impl OutputFormat {
    /// Render `descriptor` in this format
    pub fn render(&self, descriptor: &BuildDescriptor) -> Result<String> {
        match self {
            OutputFormat::Yaml => descriptor.to_yaml(),
            OutputFormat::Json => descriptor.to_json(),
        }
    }
}
