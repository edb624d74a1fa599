//! Bundles: named, ordered groups of assets with a bundle-level chain.
//!
//! Processing order is per-asset chain, then join with `"\n"`, then the
//! bundle chain over the joined text as one value.

mod registry;
mod render;

pub use registry::BundleRegistry;
pub use render::RenderMode;

use crate::asset::{Asset, MediaKind};
use crate::cache::{CacheKey, EntityId};
use crate::compressor::Scope;
use crate::content::Content;
use crate::error::Result;
use crate::hash::ContentHash;
use crate::storage::Storage;

/// Separator placed between asset contents.
pub const SEPARATOR: &str = "\n";

#[derive(Debug)]
pub struct Bundle {
    id: EntityId,
    name: String,
    assets: Vec<Asset>,
    processors: Vec<String>,
    kind: MediaKind,
}

/// A clone is a new entity with its own cache slots, so changing it through
/// the builder never aliases the original's cached content.
impl Clone for Bundle {
    fn clone(&self) -> Self {
        Self {
            id: EntityId::next(),
            name: self.name.clone(),
            assets: self.assets.clone(),
            processors: self.processors.clone(),
            kind: self.kind,
        }
    }
}

impl Bundle {
    /// Generic bundle, linked as `text/plain`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, MediaKind::Generic)
    }

    /// Script bundle (`.js`, `<script>` tags).
    pub fn script(name: impl Into<String>) -> Self {
        Self::with_kind(name, MediaKind::Script)
    }

    /// Stylesheet bundle (`.css`, `<style>` / `<link rel="stylesheet">`).
    pub fn style(name: impl Into<String>) -> Self {
        Self::with_kind(name, MediaKind::Style)
    }

    pub fn with_kind(name: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            assets: Vec::new(),
            processors: Vec::new(),
            kind,
        }
    }

    pub fn asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn with_assets(mut self, assets: impl IntoIterator<Item = Asset>) -> Self {
        self.assets.extend(assets);
        self
    }

    pub fn processors(&self) -> &[String] {
        &self.processors
    }

    pub fn with_processors(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.processors.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn get_asset(&self, index: usize) -> Option<&Asset> {
        self.assets.get(index)
    }

    /// Digest over every asset's raw digest, in order.
    pub fn hash(&self, storage: &dyn Storage) -> Result<ContentHash> {
        let hashes = self
            .assets
            .iter()
            .map(|asset| asset.hash(storage))
            .collect::<Result<Vec<_>>>()?;
        Ok(ContentHash::combine(&hashes))
    }

    /// Each asset's content with its own chain; the bundle chain is not applied.
    pub fn get_contents(&self, scope: &mut Scope<'_>, apply_processors: bool) -> Result<Vec<String>> {
        self.assets
            .iter()
            .map(|asset| asset.text(scope, apply_processors))
            .collect()
    }

    /// Joined asset contents, then the bundle chain when `apply_processors`.
    pub fn get_content(&self, scope: &mut Scope<'_>, apply_processors: bool) -> Result<String> {
        let key = CacheKey::new(self.id, apply_processors);
        if let Some(cached) = scope.cache_mut().get(&key) {
            return cached.into_text();
        }

        let joined = self.get_contents(scope, apply_processors)?.join(SEPARATOR);
        let content = if apply_processors {
            scope.processors().apply_chain(&self.processors, joined)?
        } else {
            joined
        };

        scope
            .cache_mut()
            .insert(key, Content::Text(content.clone()));
        Ok(content)
    }
}
