//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a workspace fixture holding descriptors and a local
//! artifact repository, plus counting collaborators to observe the engine.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let workspace = Workspace::new();
//!     workspace.publish("com.x", "frag", "1.0", "artifactId: frag\n");
//!     let app = workspace.descriptor("app", "artifactId: app\n");
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_fs::prelude::*;
use assert_fs::TempDir;

use maven_compose::builder::{BuildRequest, DescriptorBuilder, InheritanceBuilder};
use maven_compose::config::ComposeConfig;
use maven_compose::coordinate::Coordinate;
use maven_compose::descriptor::BuildDescriptor;
use maven_compose::error::Result;
use maven_compose::phases::orchestrator::CompositeBuilder;
use maven_compose::repository::{
    ArtifactRepository, DefaultDescriptorLocator, DescriptorLocator, DescriptorReader, LocalRepository,
    YamlDescriptorReader,
};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::descriptors;
    pub use super::{build, BuildLog, CountingBuilder, CountingRepository, SlowBuilder, Workspace};
}

/// Common descriptor YAML snippets for testing.
pub mod descriptors {
    /// Fragment contributing properties, dependencies and a plugin.
    pub const FRAG_A: &str = r#"
groupId: com.x
artifactId: frag-a
version: "1.0"
packaging: pom
name: Fragment A
url: https://example.com/frag-a
properties:
  encoding: UTF-8
  java.version: "11"
dependencies:
  - { groupId: org.slf4j, artifactId: slf4j-api, version: "1.7.36" }
build:
  plugins:
    - artifactId: maven-compiler-plugin
      version: "3.11.0"
      configuration: { release: "11" }
"#;

    /// Fragment overlapping `FRAG_A` on several fields.
    pub const FRAG_B: &str = r#"
groupId: com.x
artifactId: frag-b
version: "2.0"
packaging: pom
name: Fragment B
description: Shared test setup
properties:
  java.version: "17"
  junit.version: "5.10.0"
dependencies:
  - { groupId: org.slf4j, artifactId: slf4j-api, version: "2.0.9" }
  - { groupId: org.junit.jupiter, artifactId: junit-jupiter, version: "5.10.0", scope: test }
build:
  plugins:
    - artifactId: maven-compiler-plugin
      version: "3.13.0"
      configuration: { release: "17", parameters: "true" }
    - artifactId: maven-surefire-plugin
      version: "3.2.5"
"#;

    /// Requesting descriptor declaring both fragments.
    pub const APP: &str = r#"
groupId: com.x
artifactId: app
version: "1.0"
packaging: jar
properties:
  maven-compose.a: com.x:frag-a:1.0
  maven-compose.b: com.x:frag-b:2.0
"#;
}

/// A temporary workspace with descriptors and an artifact repository.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Root of the artifact repository
    pub fn repository_root(&self) -> PathBuf {
        self.temp.path().join("repository")
    }

    pub fn repository(&self) -> LocalRepository {
        LocalRepository::new(self.repository_root())
    }

    /// Write `<dir>/pom.yaml` and return its path
    pub fn descriptor(&self, dir: &str, yaml: &str) -> PathBuf {
        let child = self.temp.child(dir).child("pom.yaml");
        child.write_str(yaml).unwrap();
        child.path().to_path_buf()
    }

    /// Install a fragment descriptor in the artifact repository
    pub fn publish(&self, group_id: &str, artifact_id: &str, version: &str, yaml: &str) -> PathBuf {
        let path = self
            .repository()
            .artifact_path(&Coordinate::new(group_id, artifact_id, version));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, yaml).unwrap();
        path
    }

    /// Configuration pointing at this workspace's repository
    pub fn config(&self) -> ComposeConfig {
        ComposeConfig {
            repository: Some(self.repository_root()),
            ..ComposeConfig::default()
        }
    }

    /// Engine over the reference collaborators
    pub fn engine(&self) -> CompositeBuilder {
        CompositeBuilder::from_config(self.config())
    }

    /// Engine whose wrapped builder sleeps for `delay` before every build
    pub fn slow_engine(&self, delay: Duration) -> CompositeBuilder {
        let reader: Arc<dyn DescriptorReader> = Arc::new(YamlDescriptorReader);
        let locator: Arc<dyn DescriptorLocator> = Arc::new(DefaultDescriptorLocator::default());
        let repository: Arc<dyn ArtifactRepository> = Arc::new(self.repository());
        let inner = InheritanceBuilder::new(Arc::clone(&reader), Arc::clone(&locator), Arc::clone(&repository));

        CompositeBuilder::new(
            Box::new(SlowBuilder::new(Box::new(inner), delay)),
            repository,
            locator,
            reader,
            self.config(),
        )
    }

    /// Engine whose fragment resolutions and wrapped builds are counted
    pub fn counting_engine(&self, config: ComposeConfig) -> (CompositeBuilder, Arc<CountingRepository>, Arc<BuildLog>) {
        let reader: Arc<dyn DescriptorReader> = Arc::new(YamlDescriptorReader);
        let locator: Arc<dyn DescriptorLocator> = Arc::new(DefaultDescriptorLocator::default());
        let inner = InheritanceBuilder::new(
            Arc::clone(&reader),
            Arc::clone(&locator),
            Arc::new(self.repository()),
        );
        let (inner, log) = CountingBuilder::new(Box::new(inner));
        let repository = Arc::new(CountingRepository::new(self.repository()));

        let engine = CompositeBuilder::new(
            Box::new(inner),
            Arc::clone(&repository) as Arc<dyn ArtifactRepository>,
            locator,
            reader,
            config,
        );
        (engine, repository, log)
    }
}

/// Build `path` with `engine`
pub fn build(engine: &CompositeBuilder, path: &Path) -> Result<BuildDescriptor> {
    engine.build(&BuildRequest::for_file(path))
}

/// Repository wrapper counting `resolve` calls.
pub struct CountingRepository {
    inner: LocalRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new(inner: LocalRepository) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtifactRepository for CountingRepository {
    fn resolve(&self, coordinate: &Coordinate) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(coordinate)
    }
}

/// Paths of every descriptor built through a [`CountingBuilder`].
#[derive(Default)]
pub struct BuildLog {
    builds: Mutex<Vec<PathBuf>>,
}

impl BuildLog {
    /// Number of builds of files whose path contains `needle`
    pub fn builds_of(&self, needle: &str) -> usize {
        self.builds
            .lock()
            .unwrap()
            .iter()
            .filter(|path| path.to_string_lossy().contains(needle))
            .count()
    }
}

/// Builder wrapper recording every build in a shared [`BuildLog`].
pub struct CountingBuilder {
    inner: Box<dyn DescriptorBuilder>,
    log: Arc<BuildLog>,
}

impl CountingBuilder {
    pub fn new(inner: Box<dyn DescriptorBuilder>) -> (Self, Arc<BuildLog>) {
        let log = Arc::new(BuildLog::default());
        (
            Self {
                inner,
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl DescriptorBuilder for CountingBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildDescriptor> {
        self.log
            .builds
            .lock()
            .unwrap()
            .push(request.location().to_path_buf());
        self.inner.build(request)
    }
}

/// Builder wrapper delaying every build, to keep parallel builds overlapping.
pub struct SlowBuilder {
    inner: Box<dyn DescriptorBuilder>,
    delay: Duration,
}

impl SlowBuilder {
    pub fn new(inner: Box<dyn DescriptorBuilder>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl DescriptorBuilder for SlowBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildDescriptor> {
        std::thread::sleep(self.delay);
        self.inner.build(request)
    }
}
