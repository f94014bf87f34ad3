//! Phase 1: Discovery
//!
//! This is the first phase of composite assembly. It scans the properties of
//! an effective descriptor for fragment declarations and parses each one.
//!
//! ## Process
//!
//! 1.  **Scanning (`execute`)**: every property whose key starts with one of
//!     the configured prefixes declares a fragment. Properties are visited in
//!     lexicographic key order, which is also the order fragments are merged
//!     in. A malformed declaration aborts the whole discovery.
//!
//! 2.  **Cycle Detection (`check_chain`)**: before a fragment is built, its
//!     key is checked against the chain of fragments whose build led to the
//!     current request. A fragment found in its own ancestor chain, or a chain
//!     deeper than the configured bound, is reported as a cycle.

use std::path::Path;

use log::debug;

use super::Declaration;
use crate::coordinate::FragmentReference;
use crate::descriptor::BuildDescriptor;
use crate::error::{Error, Result};

/// Executes Phase 1 of the pipeline.
///
/// Returns the fragment declarations of `descriptor`, with local override
/// paths joined to `base_dir`.
pub fn execute(descriptor: &BuildDescriptor, base_dir: &Path, prefixes: &[String]) -> Result<Vec<Declaration>> {
    let declarations = descriptor
        .fragment_declarations(prefixes)
        .map(|(property, value)| {
            Ok(Declaration {
                property: property.to_string(),
                reference: FragmentReference::parse(value, base_dir)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Discovered {} fragment declaration(s) in {}",
        declarations.len(),
        descriptor.gav()
    );
    Ok(declarations)
}

/// Check that building `fragment_key` below `chain` does not close a cycle
pub fn check_chain(chain: &[String], fragment_key: &str, max_depth: usize) -> Result<()> {
    let describe = || {
        chain
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(fragment_key))
            .collect::<Vec<_>>()
            .join(" -> ")
    };

    if chain.iter().any(|ancestor| ancestor == fragment_key) {
        return Err(Error::CyclicFragment { chain: describe() });
    }
    if chain.len() >= max_depth {
        return Err(Error::CyclicFragment {
            chain: format!("{} (depth limit of {} exceeded)", describe(), max_depth),
        });
    }
    Ok(())
}
