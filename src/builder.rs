//! # Descriptor Building
//!
//! A [`DescriptorBuilder`] turns a [`BuildRequest`] into an effective
//! descriptor. The composite assembly engine decorates another builder
//! implementing the same trait, so the two can be stacked freely and the
//! engine never needs to know how single inheritance is carried out.
//!
//! [`InheritanceBuilder`] is the reference single-inheritance builder. For a
//! descriptor with a `parent` link it looks for the parent in this order:
//!
//! 1. the request's parent override, used as is;
//! 2. the `relativePath` of the link (default `..`), used only when the
//!    descriptor found there is the declared parent;
//! 3. the artifact repository.
//!
//! The parent is built recursively and folded in with
//! [`inheritance::assemble`](crate::inheritance::assemble).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::descriptor::{BuildDescriptor, Parent};
use crate::error::{Error, Result};
use crate::inheritance;
use crate::problems::ProblemCollector;
use crate::repository::{ArtifactRepository, DescriptorLocator, DescriptorReader};

/// Default `relativePath` of a parent link
const DEFAULT_PARENT_RELATIVE_PATH: &str = "..";

/// Where the raw descriptor of a request comes from
#[derive(Debug, Clone)]
pub enum DescriptorSource {
    /// A descriptor file, read by the builder
    File(PathBuf),
    /// An already parsed descriptor, as if read from `location`
    Raw {
        descriptor: Box<BuildDescriptor>,
        location: PathBuf,
    },
}

/// A request to build one descriptor
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub source: DescriptorSource,
    /// Effective parent to use instead of resolving the descriptor's parent link
    pub parent_override: Option<Arc<BuildDescriptor>>,
    fragment_chain: Vec<String>,
}

impl BuildRequest {
    /// Request to build the descriptor stored at `path`
    pub fn for_file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            source: DescriptorSource::File(path.into()),
            parent_override: None,
            fragment_chain: Vec::new(),
        }
    }

    /// Path of the descriptor file this request stands for
    pub fn location(&self) -> &Path {
        match &self.source {
            DescriptorSource::File(path) => path,
            DescriptorSource::Raw { location, .. } => location,
        }
    }

    /// Directory relative paths in the descriptor are resolved against
    pub fn base_dir(&self) -> &Path {
        self.location().parent().unwrap_or_else(|| Path::new("."))
    }

    /// Cache keys of the fragments whose build led to this request, outermost first
    pub fn fragment_chain(&self) -> &[String] {
        &self.fragment_chain
    }

    /// Request to build the fragment `fragment_key` stored at `file`
    ///
    /// The fragment is appended to the ancestor chain. The parent override is
    /// not carried over: it belongs to the originating descriptor only.
    pub fn derive_for_fragment(&self, file: &Path, fragment_key: &str) -> Self {
        let mut fragment_chain = self.fragment_chain.clone();
        fragment_chain.push(fragment_key.to_string());
        Self {
            source: DescriptorSource::File(file.to_path_buf()),
            parent_override: None,
            fragment_chain,
        }
    }

    /// Request to rebuild `descriptor` at this request's location
    pub fn derive_with_raw(&self, descriptor: BuildDescriptor, parent_override: Option<Arc<BuildDescriptor>>) -> Self {
        Self {
            source: DescriptorSource::Raw {
                descriptor: Box::new(descriptor),
                location: self.location().to_path_buf(),
            },
            parent_override,
            fragment_chain: self.fragment_chain.clone(),
        }
    }
}

/// Trait for descriptor building - allows decorating and mocking
pub trait DescriptorBuilder: Send + Sync {
    fn build(&self, request: &BuildRequest) -> Result<BuildDescriptor>;
}

/// Reference single-inheritance builder
pub struct InheritanceBuilder {
    reader: Arc<dyn DescriptorReader>,
    locator: Arc<dyn DescriptorLocator>,
    repository: Arc<dyn ArtifactRepository>,
}

impl InheritanceBuilder {
    pub fn new(
        reader: Arc<dyn DescriptorReader>,
        locator: Arc<dyn DescriptorLocator>,
        repository: Arc<dyn ArtifactRepository>,
    ) -> Self {
        Self {
            reader,
            locator,
            repository,
        }
    }

    fn build_inherited(
        &self,
        mut descriptor: BuildDescriptor,
        location: &Path,
        parent_override: Option<&Arc<BuildDescriptor>>,
        lineage: &mut Vec<String>,
    ) -> Result<BuildDescriptor> {
        let parent_link = match descriptor.parent.clone() {
            Some(link) => link,
            None => return Ok(descriptor),
        };

        let parent = match parent_override {
            Some(parent) => {
                debug!("Using parent override for {} at {}", parent_link.gav(), location.display());
                (**parent).clone()
            }
            None => {
                let gav = descriptor.gav();
                if lineage.contains(&gav) {
                    let mut chain = lineage.clone();
                    chain.push(gav);
                    return Err(Error::Build {
                        location: location.to_path_buf(),
                        message: format!("Cycle detected in parent declarations: {}", chain.join(" -> ")),
                    });
                }
                lineage.push(gav);
                let (raw_parent, parent_location) = self.read_parent(&parent_link, location)?;
                let built = self.build_inherited(raw_parent, &parent_location, None, lineage);
                lineage.pop();
                built?
            }
        };

        let mut problems = ProblemCollector::new();
        inheritance::assemble(&mut descriptor, &parent, &mut problems);
        problems.report(&parent_link.gav())?;
        Ok(descriptor)
    }

    /// Find and read the raw parent descriptor of `location`
    fn read_parent(&self, link: &Parent, location: &Path) -> Result<(BuildDescriptor, PathBuf)> {
        let base_dir = location.parent().unwrap_or_else(|| Path::new("."));
        let relative = link
            .relative_path
            .as_deref()
            .unwrap_or(DEFAULT_PARENT_RELATIVE_PATH);

        if !relative.is_empty() {
            let mut candidate = base_dir.join(relative);
            if candidate.is_dir() {
                candidate = self.locator.locate(&candidate);
            }
            if candidate.is_file() {
                let parent = self.reader.read(&candidate)?;
                if parent.matches(&link.coordinate()) {
                    debug!("Parent {} found at {}", link.gav(), candidate.display());
                    return Ok((parent, candidate));
                }
                debug!(
                    "Descriptor at {} is {}, not parent {}; falling back to the repository",
                    candidate.display(),
                    parent.gav(),
                    link.gav()
                );
            }
        }

        let path = self
            .repository
            .resolve(&link.coordinate())
            .map_err(|e| Error::Build {
                location: location.to_path_buf(),
                message: format!("cannot resolve parent {}: {}", link.gav(), e),
            })?;
        Ok((self.reader.read(&path)?, path))
    }
}

impl DescriptorBuilder for InheritanceBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildDescriptor> {
        let descriptor = match &request.source {
            DescriptorSource::File(path) => self.reader.read(path)?,
            DescriptorSource::Raw { descriptor, .. } => (**descriptor).clone(),
        };
        self.build_inherited(
            descriptor,
            request.location(),
            request.parent_override.as_ref(),
            &mut Vec::new(),
        )
    }
}
