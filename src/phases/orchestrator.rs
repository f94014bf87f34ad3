//! Orchestrator for composite assembly
//!
//! [`CompositeBuilder`] decorates another [`DescriptorBuilder`]. A build first
//! runs the wrapped builder, then drives every declared fragment through the
//! 4 phases. The engine is also the builder fragments are built with, so a
//! fragment's own fragments are composed before it is merged.
//!
//! All engine state lives in the builder: the resolution cache, the build
//! cache and the configuration. Nothing is global, and one `CompositeBuilder`
//! can be shared between threads (see [`CompositeBuilder::build_all`]).

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use super::resolution::FragmentResolver;
use super::{phase1, phase3, phase4, Declaration, FragmentNode};
use crate::builder::{BuildRequest, DescriptorBuilder, InheritanceBuilder};
use crate::cache::{BuildCache, ResolutionCache};
use crate::config::ComposeConfig;
use crate::defaults::default_repository_root;
use crate::descriptor::BuildDescriptor;
use crate::error::Result;
use crate::repository::{
    ArtifactRepository, DefaultDescriptorLocator, DescriptorLocator, DescriptorReader, LocalRepository,
    YamlDescriptorReader,
};

/// Composite assembly engine
pub struct CompositeBuilder {
    inner: Box<dyn DescriptorBuilder>,
    resolver: FragmentResolver,
    build_cache: BuildCache,
    config: ComposeConfig,
}

impl CompositeBuilder {
    /// Wrap `inner`, resolving fragments with the given collaborators
    pub fn new(
        inner: Box<dyn DescriptorBuilder>,
        repository: Arc<dyn ArtifactRepository>,
        locator: Arc<dyn DescriptorLocator>,
        reader: Arc<dyn DescriptorReader>,
        config: ComposeConfig,
    ) -> Self {
        let resolver = FragmentResolver::new(repository, locator, reader, config.validate_local_overrides);
        Self {
            inner,
            resolver,
            build_cache: BuildCache::new(),
            config,
        }
    }

    /// Engine over the reference collaborators: YAML descriptors, a local
    /// repository and an [`InheritanceBuilder`] as the wrapped builder
    pub fn from_config(config: ComposeConfig) -> Self {
        let root = config
            .repository
            .clone()
            .unwrap_or_else(default_repository_root);
        debug!("Using artifact repository at {}", root.display());

        let repository: Arc<dyn ArtifactRepository> = Arc::new(LocalRepository::new(root));
        let locator: Arc<dyn DescriptorLocator> =
            Arc::new(DefaultDescriptorLocator::new(&config.descriptor_file_name));
        let reader: Arc<dyn DescriptorReader> = Arc::new(YamlDescriptorReader);
        let inner = InheritanceBuilder::new(Arc::clone(&reader), Arc::clone(&locator), Arc::clone(&repository));

        Self::new(Box::new(inner), repository, locator, reader, config)
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub fn resolution_cache(&self) -> &ResolutionCache {
        self.resolver.cache()
    }

    pub fn build_cache(&self) -> &BuildCache {
        &self.build_cache
    }

    /// Fold every fragment declared by `descriptor` into it
    ///
    /// `request` is the request `descriptor` was built for. On error the
    /// partially composed descriptor is dropped; cache entries made on the
    /// way are kept.
    pub fn compose(&self, mut descriptor: BuildDescriptor, request: &BuildRequest) -> Result<BuildDescriptor> {
        let declarations = phase1::execute(&descriptor, request.base_dir(), &self.config.property_prefixes)?;
        if declarations.is_empty() {
            return Ok(descriptor);
        }

        for declaration in &declarations {
            debug!(
                "Composing {} from property {} into {}",
                declaration.reference.coordinate,
                declaration.property,
                descriptor.gav()
            );
            let artifact = self.resolver.resolve(&declaration.reference)?;
            let fragment = phase3::execute(self, &self.build_cache, &artifact, request, self.config.max_depth)?;
            descriptor = phase4::execute(
                self.inner.as_ref(),
                self.config.strategy,
                descriptor,
                &fragment,
                &artifact,
                request,
            )?;
        }

        info!(
            "Composed {} with {} fragment(s)",
            descriptor.gav(),
            descriptor.assembly.len()
        );
        Ok(descriptor)
    }

    /// Build several requests in parallel, sharing caches
    ///
    /// Results are returned in request order.
    pub fn build_all(&self, requests: &[BuildRequest]) -> Vec<Result<BuildDescriptor>> {
        requests.par_iter().map(|request| self.build(request)).collect()
    }

    /// Build the descriptor stored at `path`
    pub fn build_file(&self, path: &Path) -> Result<BuildDescriptor> {
        self.build(&BuildRequest::for_file(path))
    }

    /// Fragment declarations of the descriptor built for `request`, in merge order
    ///
    /// Only the wrapped builder runs; nothing is resolved.
    pub fn declarations(&self, request: &BuildRequest) -> Result<Vec<Declaration>> {
        let descriptor = self.inner.build(request)?;
        phase1::execute(&descriptor, request.base_dir(), &self.config.property_prefixes)
    }

    /// Fragment graph of the descriptor built for `request`
    ///
    /// Every declared fragment is resolved and built (through the caches),
    /// then its own declarations are expanded. Declarations are listed in
    /// merge order. A fragment reached twice is listed twice.
    pub fn fragment_tree(&self, request: &BuildRequest) -> Result<Vec<FragmentNode>> {
        let descriptor = self.inner.build(request)?;
        self.expand(&descriptor, request)
    }

    fn expand(&self, descriptor: &BuildDescriptor, request: &BuildRequest) -> Result<Vec<FragmentNode>> {
        let declarations = phase1::execute(descriptor, request.base_dir(), &self.config.property_prefixes)?;
        let mut nodes = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            let artifact = self.resolver.resolve(&declaration.reference)?;
            let key = artifact.coordinate.key();
            phase3::execute(self, &self.build_cache, &artifact, request, self.config.max_depth)?;

            let fragment_request = request.derive_for_fragment(&artifact.file, &key);
            let raw_fragment = self.inner.build(&fragment_request)?;
            let children = self.expand(&raw_fragment, &fragment_request)?;

            nodes.push(FragmentNode {
                property: declaration.property,
                coordinate: artifact.coordinate,
                file: artifact.file,
                origin: artifact.origin,
                children,
            });
        }
        Ok(nodes)
    }
}

impl DescriptorBuilder for CompositeBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildDescriptor> {
        let descriptor = self.inner.build(request)?;
        self.compose(descriptor, request)
    }
}
