//! Phase 3: Building
//!
//! Builds the composite descriptor of a resolved fragment by re-entering the
//! engine with a request for the fragment's file. The result is stored in the
//! [`BuildCache`] under the fragment's coordinate key, so a fragment reached
//! through several paths (a diamond) is built once and shared as the same
//! `Arc`.
//!
//! The ancestor chain is checked before the cache is touched, so a cycle
//! within one build is reported with its full chain of fragments. A cycle
//! split across parallel builds (one thread building `a` and waiting for `b`
//! while another builds `b` and waits for `a`) is caught by the cache's
//! wait-for check instead; see [`KeyedCache`](crate::cache::KeyedCache).

use std::sync::Arc;

use log::debug;

use super::discovery::check_chain;
use super::ResolvedArtifact;
use crate::builder::{BuildRequest, DescriptorBuilder};
use crate::cache::BuildCache;
use crate::descriptor::BuildDescriptor;
use crate::error::{Error, Result};

/// Executes Phase 3 of the pipeline for one fragment.
///
/// `engine` is the composite builder itself; `request` is the request of the
/// descriptor declaring the fragment.
pub fn execute(
    engine: &dyn DescriptorBuilder,
    cache: &BuildCache,
    artifact: &ResolvedArtifact,
    request: &BuildRequest,
    max_depth: usize,
) -> Result<Arc<BuildDescriptor>> {
    let key = artifact.coordinate.key();
    check_chain(request.fragment_chain(), &key, max_depth)?;

    let mut built = false;
    let descriptor = cache.get_or_try_insert_with(&key, || {
        built = true;
        debug!(
            "Build cache miss for {}, building {}",
            key,
            artifact.file.display()
        );
        let fragment_request = request.derive_for_fragment(&artifact.file, &key);
        engine
            .build(&fragment_request)
            .map(Arc::new)
            .map_err(|e| Error::RecursiveBuild {
                coordinate: artifact.coordinate.to_string(),
                source: Box::new(e),
            })
    })?;
    if !built {
        debug!("Build cache hit for {}", key);
    }
    Ok(descriptor)
}
