//! Phase 4: Assembly
//!
//! Merges one built fragment onto the requesting descriptor. Each fragment is
//! merged at most once per descriptor: the descriptor's [`AssemblyRecord`]
//! lists every fragment already applied, including the fragments that came
//! in through another fragment.
//!
//! Two strategies are available (see [`MergeStrategy`]):
//!
//! - **Direct**: [`inheritance::assemble`] with the fragment as the parent.
//! - **Substitute parent**: the wrapped builder rebuilds a copy of the
//!   descriptor whose parent link points at the fragment, with the fragment
//!   supplied as the parent override. The original parent link and assembly
//!   record are put back on the result. The requesting descriptor itself is
//!   never modified, so nothing needs restoring when the rebuild fails.
//!
//! [`AssemblyRecord`]: crate::descriptor::AssemblyRecord

use std::sync::Arc;

use log::{debug, info};

use super::ResolvedArtifact;
use crate::builder::{BuildRequest, DescriptorBuilder};
use crate::config::MergeStrategy;
use crate::descriptor::{BuildDescriptor, Parent};
use crate::error::Result;
use crate::inheritance;
use crate::path::relativize_path;
use crate::problems::ProblemCollector;

/// Executes Phase 4 of the pipeline for one fragment.
///
/// Returns the requesting descriptor with the fragment merged in.
pub fn execute(
    inner: &dyn DescriptorBuilder,
    strategy: MergeStrategy,
    requesting: BuildDescriptor,
    fragment: &Arc<BuildDescriptor>,
    artifact: &ResolvedArtifact,
    request: &BuildRequest,
) -> Result<BuildDescriptor> {
    let key = artifact.coordinate.key();
    if requesting.assembly.contains(&key) {
        debug!("Fragment {} already merged into {}", artifact.coordinate, requesting.gav());
        return Ok(requesting);
    }

    let mut problems = ProblemCollector::new();
    inspect_fragment(&requesting, fragment, &artifact.coordinate.gav(), &mut problems);

    let mut merged = match strategy {
        MergeStrategy::Direct => {
            let mut merged = requesting;
            inheritance::assemble(&mut merged, fragment, &mut problems);
            merged
        }
        MergeStrategy::SubstituteParent => substitute_parent(inner, &requesting, fragment, artifact, request)?,
    };
    problems.report(&artifact.coordinate.gav())?;

    merged.assembly.record(&key, &fragment.assembly);
    info!("Applied fragment {} to {}", artifact.coordinate, merged.gav());
    Ok(merged)
}

fn substitute_parent(
    inner: &dyn DescriptorBuilder,
    requesting: &BuildDescriptor,
    fragment: &Arc<BuildDescriptor>,
    artifact: &ResolvedArtifact,
    request: &BuildRequest,
) -> Result<BuildDescriptor> {
    let fragment_file = std::path::absolute(&artifact.file)?;
    let base_dir = std::path::absolute(request.base_dir())?;
    let relative_path = relativize_path(&fragment_file, &base_dir);
    debug!(
        "Substituting parent of {} with {} at {}",
        requesting.gav(),
        artifact.coordinate,
        relative_path
    );

    let mut substitute = requesting.clone();
    substitute.parent = Some(Parent {
        group_id: artifact.coordinate.group_id.clone(),
        artifact_id: artifact.coordinate.artifact_id.clone(),
        version: artifact.coordinate.version.clone(),
        relative_path: Some(relative_path),
    });

    let mut rebuilt = inner.build(&request.derive_with_raw(substitute, Some(Arc::clone(fragment))))?;
    rebuilt.parent = requesting.parent.clone();
    rebuilt.assembly = requesting.assembly.clone();
    Ok(rebuilt)
}

/// Record warnings about parts of the fragment that will not carry over as written
fn inspect_fragment(
    requesting: &BuildDescriptor,
    fragment: &BuildDescriptor,
    fragment_gav: &str,
    problems: &mut ProblemCollector,
) {
    if !fragment.modules.is_empty() {
        problems.warn(format!(
            "Fragment {} declares modules {:?}, which are not inherited",
            fragment_gav, fragment.modules
        ));
    }

    for plugin in &requesting.build.plugins {
        let requested = match plugin.version.as_deref() {
            Some(version) => version,
            None => continue,
        };
        let inherited = fragment
            .build
            .plugins
            .iter()
            .filter(|candidate| candidate.inherited && candidate.key() == plugin.key())
            .find_map(|candidate| candidate.version.as_deref());
        if let Some(inherited) = inherited {
            if inherited != requested {
                problems.warn(format!(
                    "Plugin {} version {} overrides version {} from fragment {}",
                    plugin.key(),
                    requested,
                    inherited,
                    fragment_gav
                ));
            }
        }
    }
}
