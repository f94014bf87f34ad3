//! # Error Handling
//!
//! This module defines the centralized error type for `maven-compose`. It uses
//! the `thiserror` library to create a single `Error` enum that covers every
//! failure mode of composite assembly, with messages that always identify the
//! fragment coordinate involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. The first group of variants is raised by the
//!   composite assembly engine itself (malformed fragment declarations,
//!   mismatched local overrides, failed resolution, merge problems, failed
//!   recursive builds and fragment cycles). The second group covers the
//!   ambient failures of the reference collaborators (I/O, YAML, config).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors are recoverable for the current `compose` call: the
//! engine never retries and never returns a partially assembled descriptor.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for maven-compose operations
#[derive(Error, Debug)]
pub enum Error {
    /// A fragment declaration could not be parsed into a coordinate.
    ///
    /// Raised when fewer than three (or more than five) colon-separated
    /// fields are present, or when a mandatory field is empty.
    #[error("Invalid fragment coordinate '{value}': {message}")]
    InvalidCoordinate { value: String, message: String },

    /// A local override directory contains a descriptor whose own coordinate
    /// does not match the declared one.
    #[error("Declared fragment {declared} does not match descriptor {found} located at {}", location.display())]
    CoordinateMismatch {
        declared: String,
        found: String,
        location: PathBuf,
    },

    /// The artifact repository could not resolve a fragment.
    #[error("Failed to resolve fragment {coordinate}: {diagnostic}")]
    ResolutionFailed {
        coordinate: String,
        diagnostic: String,
    },

    /// Merging a fragment produced one or more errors or fatals.
    ///
    /// `problems` lists errors first, then fatals, in collection order.
    #[error("There were problems assembling the inheritance model for composite artifact {gav}. Errors:{}", problems.iter().map(|p| format!("\n{}", p)).collect::<String>())]
    MergeProblems { gav: String, problems: Vec<String> },

    /// Building a fragment's own descriptor failed.
    #[error("Failed to build fragment {coordinate}: {source}")]
    RecursiveBuild {
        coordinate: String,
        #[source]
        source: Box<Error>,
    },

    /// A fragment appears in its own ancestor chain, or the chain exceeds
    /// the configured depth bound.
    #[error("Cycle detected in fragment declarations: {chain}")]
    CyclicFragment { chain: String },

    /// The wrapped single-inheritance builder failed.
    #[error("Descriptor build error for {}: {message}", location.display())]
    Build { location: PathBuf, message: String },

    /// An error occurred while parsing the `.maven-compose.yaml` configuration.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A cache mutex has been poisoned by a panicking thread.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// The innermost error, looking through nested `RecursiveBuild` layers
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::RecursiveBuild { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_coordinate() {
        let error = Error::InvalidCoordinate {
            value: "com.x:frag".to_string(),
            message: "expected at least 3 fields".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid fragment coordinate"));
        assert!(display.contains("com.x:frag"));
    }

    #[test]
    fn test_error_display_coordinate_mismatch() {
        let error = Error::CoordinateMismatch {
            declared: "com.x:frag:1.0".to_string(),
            found: "com.x:other:1.0".to_string(),
            location: PathBuf::from("/work/frag/pom.yaml"),
        };
        let display = format!("{}", error);
        assert!(display.contains("com.x:frag:1.0"));
        assert!(display.contains("com.x:other:1.0"));
        assert!(display.contains("/work/frag/pom.yaml"));
    }

    #[test]
    fn test_error_display_merge_problems_one_per_line() {
        let error = Error::MergeProblems {
            gav: "com.x:frag:1.0".to_string(),
            problems: vec!["first".to_string(), "second".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("composite artifact com.x:frag:1.0"));
        assert!(display.ends_with("Errors:\nfirst\nsecond"));
    }

    #[test]
    fn test_error_recursive_build_keeps_source() {
        let error = Error::RecursiveBuild {
            coordinate: "com.x:frag:1.0".to_string(),
            source: Box::new(Error::ResolutionFailed {
                coordinate: "com.x:base:2.0".to_string(),
                diagnostic: "not found".to_string(),
            }),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to build fragment com.x:frag:1.0"));
        assert!(display.contains("com.x:base:2.0"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_root_cause_unwraps_nested_builds() {
        let error = Error::RecursiveBuild {
            coordinate: "com.x:a:1".to_string(),
            source: Box::new(Error::RecursiveBuild {
                coordinate: "com.x:b:1".to_string(),
                source: Box::new(Error::CyclicFragment {
                    chain: "b -> a -> b".to_string(),
                }),
            }),
        };
        assert!(matches!(error.root_cause(), Error::CyclicFragment { .. }));
    }

    #[test]
    fn test_error_display_cycle() {
        let error = Error::CyclicFragment {
            chain: "a -> b -> a".to_string(),
        };
        assert!(error.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "unknown strategy".to_string(),
            hint: Some("use 'direct' or 'substitute-parent'".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }
}
