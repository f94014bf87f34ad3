//! Phase 2: Resolution
//!
//! Binds a fragment declaration to a concrete file.
//!
//! A declaration carrying a local override (`@relativePath`) never touches the
//! artifact repository or the resolution cache: the path is used as is, or,
//! when it names a directory, the descriptor file inside it. In the latter
//! case the located descriptor must be the declared artifact.
//!
//! Every other declaration is resolved through the [`ResolutionCache`], so
//! the repository is asked at most once per coordinate for the lifetime of
//! the engine.

use std::sync::Arc;

use log::debug;

use super::{ArtifactOrigin, ResolvedArtifact};
use crate::cache::ResolutionCache;
use crate::coordinate::FragmentReference;
use crate::error::{Error, Result};
use crate::repository::{ArtifactRepository, DescriptorLocator, DescriptorReader};

/// Resolves fragment declarations, caching repository lookups
pub struct FragmentResolver {
    repository: Arc<dyn ArtifactRepository>,
    locator: Arc<dyn DescriptorLocator>,
    reader: Arc<dyn DescriptorReader>,
    cache: ResolutionCache,
    validate_local_overrides: bool,
}

impl FragmentResolver {
    pub fn new(
        repository: Arc<dyn ArtifactRepository>,
        locator: Arc<dyn DescriptorLocator>,
        reader: Arc<dyn DescriptorReader>,
        validate_local_overrides: bool,
    ) -> Self {
        Self {
            repository,
            locator,
            reader,
            cache: ResolutionCache::new(),
            validate_local_overrides,
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Resolve `reference` to a file
    pub fn resolve(&self, reference: &FragmentReference) -> Result<ResolvedArtifact> {
        let coordinate = &reference.coordinate;

        if let Some(location) = &reference.location {
            if !location.is_dir() {
                debug!("Using local override {} for {}", location.display(), coordinate);
                return Ok(ResolvedArtifact {
                    coordinate: coordinate.clone(),
                    file: location.clone(),
                    origin: ArtifactOrigin::LocalOverride,
                });
            }

            let file = self.locator.locate(location);
            if self.validate_local_overrides {
                let descriptor = self.reader.read(&file)?;
                if !descriptor.matches(coordinate) {
                    return Err(Error::CoordinateMismatch {
                        declared: coordinate.gav(),
                        found: descriptor.gav(),
                        location: file,
                    });
                }
            }
            debug!("Using local override {} for {}", file.display(), coordinate);
            return Ok(ResolvedArtifact {
                coordinate: coordinate.clone(),
                file,
                origin: ArtifactOrigin::LocalOverride,
            });
        }

        let key = coordinate.key();
        let mut missed = false;
        let resolved = self.cache.get_or_try_insert_with(&key, || {
            missed = true;
            debug!("Resolution cache miss for {}, asking the repository", key);
            let file = self
                .repository
                .resolve(coordinate)
                .map_err(|e| match e {
                    Error::ResolutionFailed { .. } => e,
                    other => Error::ResolutionFailed {
                        coordinate: coordinate.to_string(),
                        diagnostic: other.to_string(),
                    },
                })?;
            Ok(ResolvedArtifact {
                coordinate: coordinate.clone(),
                file,
                origin: ArtifactOrigin::Repository,
            })
        })?;
        if !missed {
            debug!("Resolution cache hit for {}", key);
        }
        Ok(resolved)
    }
}
