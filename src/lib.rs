//! # Maven Compose Library
//!
//! This library emulates multiple inheritance for build descriptors. A
//! descriptor declares *fragments* (artifact-addressed descriptors) through
//! specially prefixed properties, and the engine merges every fragment onto
//! the descriptor's effective form as if each one were an additional parent.
//! It is designed to be used by the `maven-compose` command-line tool but can
//! also wrap any other [`DescriptorBuilder`](builder::DescriptorBuilder).
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use maven_compose::coordinate::FragmentReference;
//! use maven_compose::path::relativize;
//!
//! // Parse a fragment declaration relative to the declaring descriptor
//! let reference = FragmentReference::parse("com.x:frag:1.0:pom:ci", Path::new("/work/app")).unwrap();
//! assert_eq!(reference.coordinate.key(), "com.x:frag:1.0:compile:pom:ci");
//! assert!(reference.location.is_none());
//!
//! // Compute the relative path used when a fragment stands in as parent
//! assert_eq!(relativize("/work/frag/pom.yaml", "/work/app"), "../frag/pom.yaml");
//! ```
//!
//! ## Core Concepts
//!
//! - **Descriptors (`descriptor`)**: The YAML build descriptor model.
//! - **Coordinates (`coordinate`)**: Fragment declarations and cache keys.
//! - **Inheritance (`inheritance`, `problems`)**: The single-inheritance field
//!   merge and the problems it reports.
//! - **Collaborators (`repository`, `builder`)**: Artifact resolution,
//!   descriptor I/O and the wrapped single-inheritance builder.
//! - **Phases (`phases`)**: Discovery, resolution, building and assembly of
//!   fragments, driven by `phases::orchestrator::CompositeBuilder`.
//! - **Caching (`cache`)**: At-most-once resolution and building per coordinate.
//!
//! ## Execution Flow
//!
//! 1.  **Build**: The wrapped builder produces the effective descriptor.
//! 2.  **Discovery**: Fragment declarations are read from its properties.
//! 3.  **Resolution**: Each fragment is bound to a file (local override first).
//! 4.  **Building**: Each fragment is built recursively through the engine.
//! 5.  **Assembly**: Each fragment is merged onto the descriptor, once.

pub mod builder;
pub mod cache;
pub mod config;
pub mod coordinate;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod inheritance;
pub mod output;
pub mod path;
pub mod phases;
pub mod problems;
pub mod repository;

#[cfg(test)]
mod path_proptest;
