//! # Artifact Repository and Descriptor I/O
//!
//! This module defines the collaborators the composite assembly engine talks
//! to when it needs to turn a coordinate into a file and a file into a
//! descriptor. Each one is a small trait so that the engine never depends on
//! a concrete storage layout or document format:
//!
//! - **`ArtifactRepository`**: resolves a coordinate to a local file.
//! - **`DescriptorLocator`**: finds the descriptor file inside a directory.
//! - **`DescriptorReader`**: reads a raw descriptor from a file.
//!
//! The default implementations (`LocalRepository`, `DefaultDescriptorLocator`
//! and `YamlDescriptorReader`) use a file-system repository with the
//! conventional `group/artifact/version/artifact-version[-classifier].type`
//! layout and YAML descriptors. Tests replace them with mocks to count calls
//! and simulate failures.

use std::path::{Path, PathBuf};

use log::debug;

use crate::coordinate::Coordinate;
use crate::defaults::DEFAULT_DESCRIPTOR_FILE_NAME;
use crate::descriptor::BuildDescriptor;
use crate::error::{Error, Result};

/// Trait for repository resolution - allows mocking in tests
pub trait ArtifactRepository: Send + Sync {
    /// Resolves a coordinate to a file on the local filesystem.
    ///
    /// Any error is reported by the engine as a failed resolution of the
    /// coordinate, carrying the error's message as diagnostic.
    fn resolve(&self, coordinate: &Coordinate) -> Result<PathBuf>;
}

/// Finds the descriptor file inside a directory
pub trait DescriptorLocator: Send + Sync {
    fn locate(&self, directory: &Path) -> PathBuf;
}

/// Reads a raw (not yet inherited) descriptor from a file
pub trait DescriptorReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<BuildDescriptor>;
}

/// File-system repository using the maven2 directory layout
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of `coordinate` inside the repository, whether it exists or not
    pub fn artifact_path(&self, coordinate: &Coordinate) -> PathBuf {
        let mut path = self.root.clone();
        for segment in coordinate.group_id.split('.') {
            path.push(segment);
        }
        path.push(&coordinate.artifact_id);
        path.push(&coordinate.version);

        let mut file_name = format!("{}-{}", coordinate.artifact_id, coordinate.version);
        if !coordinate.classifier.is_empty() {
            file_name.push('-');
            file_name.push_str(&coordinate.classifier);
        }
        file_name.push('.');
        file_name.push_str(&coordinate.r#type);
        path.push(file_name);
        path
    }
}

impl ArtifactRepository for LocalRepository {
    fn resolve(&self, coordinate: &Coordinate) -> Result<PathBuf> {
        let path = self.artifact_path(coordinate);
        debug!("Looking up {} at {}", coordinate, path.display());
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::ResolutionFailed {
                coordinate: coordinate.to_string(),
                diagnostic: format!(
                    "artifact not found in repository {} (expected {})",
                    self.root.display(),
                    path.display()
                ),
            })
        }
    }
}

/// Locates `<directory>/<file name>`
#[derive(Debug, Clone)]
pub struct DefaultDescriptorLocator {
    file_name: String,
}

impl DefaultDescriptorLocator {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
        }
    }
}

impl Default for DefaultDescriptorLocator {
    fn default() -> Self {
        Self::new(DEFAULT_DESCRIPTOR_FILE_NAME)
    }
}

impl DescriptorLocator for DefaultDescriptorLocator {
    fn locate(&self, directory: &Path) -> PathBuf {
        directory.join(&self.file_name)
    }
}

/// Reads YAML descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDescriptorReader;

impl DescriptorReader for YamlDescriptorReader {
    fn read(&self, path: &Path) -> Result<BuildDescriptor> {
        BuildDescriptor::from_file(path).map_err(|e| Error::Build {
            location: path.to_path_buf(),
            message: format!("failed to read descriptor: {}", e),
        })
    }
}
