//! Composition root and per-request scope.

use std::sync::Arc;

use crate::bundle::{BundleRegistry, RenderMode};
use crate::cache::ContentCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::processor::{OnConflict, ProcessorRegistry, Processors};
use crate::serve::route::DEFAULT_PREFIX;
use crate::storage::{FsStorage, Storage};
use crate::{debug, log};

/// Owns the registries and the storage collaborator.
///
/// Registries are filled at startup and read-mostly afterwards. Every render
/// or fetch runs inside a [`Scope`] obtained from [`Compressor::scope`].
pub struct Compressor {
    processors: ProcessorRegistry,
    bundles: BundleRegistry,
    storage: Arc<dyn Storage>,
    prefix: String,
}

impl Compressor {
    /// Empty bundle registry, built-in processors, default URL prefix.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            processors: ProcessorRegistry::new(),
            bundles: BundleRegistry::new(),
            storage: Arc::new(storage),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Override the URL prefix linked URLs are built under.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = normalize_prefix(&prefix.into());
        self
    }

    /// Build from a loaded config, registering its declared bundles.
    ///
    /// Processor names are checked now so that a typo fails at startup
    /// instead of at first render.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = FsStorage::new(config.storage_root());
        let compressor = Self::new(storage).with_prefix(config.serve.prefix.clone());

        for declared in &config.bundle {
            let bundle = declared.to_bundle()?;
            compressor.check_processors(&bundle)?;
            let on_conflict = OnConflict::from_replace(declared.replace);
            compressor.bundles.register(bundle, on_conflict)?;
        }

        debug!("bundle"; "{} bundles from config", compressor.bundles.len());
        Ok(compressor)
    }

    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    pub fn bundles(&self) -> &BundleRegistry {
        &self.bundles
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Start one operation with a fresh content cache.
    pub fn scope(&self) -> Scope<'_> {
        Scope::new(self.storage(), self.processors.snapshot(), &self.prefix)
    }

    /// Markup for a registered bundle, as a template helper would emit it.
    pub fn render(&self, scope: &mut Scope<'_>, name: &str, mode: RenderMode) -> Result<String> {
        let bundle = self.bundles.get(name)?;
        bundle.render(scope, mode)
    }

    fn check_processors(&self, bundle: &crate::Bundle) -> Result<()> {
        let asset_chains = bundle.assets().iter().map(|a| a.processors());
        for name in asset_chains.flatten().chain(bundle.processors()) {
            if !self.processors.contains(name) {
                log!("error"; "bundle `{}` uses unknown processor `{}`", bundle.name(), name);
                return Err(Error::ProcessorNotFound(name.clone()));
            }
        }
        Ok(())
    }
}

/// `"/_compressor/"` and `"_compressor"` both become `"/_compressor"`; an
/// empty prefix mounts at the root.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// State for a single render or fetch.
///
/// Holds a snapshot of the processor registry, so a concurrent replacement
/// never changes processors halfway through an operation, and the
/// request-scoped [`ContentCache`].
pub struct Scope<'a> {
    storage: &'a dyn Storage,
    processors: Arc<Processors>,
    prefix: &'a str,
    cache: ContentCache,
}

impl<'a> Scope<'a> {
    pub fn new(storage: &'a dyn Storage, processors: Arc<Processors>, prefix: &'a str) -> Self {
        Self {
            storage,
            processors,
            prefix,
            cache: ContentCache::new(),
        }
    }

    pub fn storage(&self) -> &'a dyn Storage {
        self.storage
    }

    pub fn processors(&self) -> &Arc<Processors> {
        &self.processors
    }

    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ContentCache {
        &mut self.cache
    }
}
