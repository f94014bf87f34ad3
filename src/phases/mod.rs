//! Implementation of the 4 phases of composite assembly.
//!
//! ## Overview
//!
//! Once the wrapped builder has produced the effective descriptor of a
//! request, every declared fragment goes through 4 phases:
//! 1. Discovery - Find fragment declarations among the descriptor's properties
//! 2. Resolution - Bind each fragment coordinate to a file (cached)
//! 3. Building - Build the fragment's own composite descriptor (cached, recursive)
//! 4. Assembly - Merge the fragment onto the requesting descriptor, at most once
//!
//! The orchestrator drives the phases and re-enters itself from phase 3, so a
//! fragment's own fragments are composed before the fragment is merged.

use std::path::PathBuf;

use crate::coordinate::{Coordinate, FragmentReference};

// Phase modules
pub mod assembly;
pub mod building;
pub mod discovery;
pub mod orchestrator;
pub mod resolution;

pub use assembly as phase4;
pub use building as phase3;
pub use discovery as phase1;
pub use resolution as phase2;

/// A fragment declared by a descriptor property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property key holding the declaration
    pub property: String,
    pub reference: FragmentReference,
}

/// Where a resolved fragment file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactOrigin {
    /// The `@relativePath` of the declaration
    LocalOverride,
    /// The artifact repository
    Repository,
}

/// A fragment coordinate bound to a concrete file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub coordinate: Coordinate,
    pub file: PathBuf,
    pub origin: ArtifactOrigin,
}

/// One node of the fragment graph of a descriptor
#[derive(Debug, Clone)]
pub struct FragmentNode {
    pub property: String,
    pub coordinate: Coordinate,
    pub file: PathBuf,
    pub origin: ArtifactOrigin,
    /// Fragments declared by this fragment
    pub children: Vec<FragmentNode>,
}

impl FragmentNode {
    /// Number of nodes in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FragmentNode::count).sum::<usize>()
    }
}
