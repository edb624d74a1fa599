//! `[[bundle]]` declarations.
//!
//! # Example
//!
//! ```toml
//! [[bundle]]
//! name = "site"
//! kind = "style"              # generic | script | style
//! processors = ["cssmin"]     # bundle chain, applied to the joined assets
//!
//! [[bundle.asset]]
//! file = "css/base.css"       # relative to [storage].root
//!
//! [[bundle.asset]]
//! content = "body { margin: 0 }"
//! processors = []
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::asset::{Asset, MediaKind};
use crate::bundle::Bundle;
use crate::content::ContentKind;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfig {
    pub name: String,

    #[serde(default)]
    pub kind: MediaKind,

    #[serde(default)]
    pub processors: Vec<String>,

    /// Replace an already registered bundle of the same name.
    #[serde(default)]
    pub replace: bool,

    #[serde(default, rename = "asset")]
    pub assets: Vec<AssetConfig>,
}

/// Exactly one of `file` and `content` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub file: Option<PathBuf>,
    pub content: Option<String>,
    pub processors: Vec<String>,
    /// Declared kind of a file asset; inferred from its extension otherwise.
    pub kind: Option<ContentKind>,
}

impl BundleConfig {
    pub fn to_bundle(&self) -> Result<Bundle> {
        let assets = self
            .assets
            .iter()
            .enumerate()
            .map(|(index, asset)| asset.to_asset(&self.name, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Bundle::with_kind(self.name.clone(), self.kind)
            .with_assets(assets)
            .with_processors(self.processors.iter().cloned()))
    }
}

impl AssetConfig {
    fn to_asset(&self, bundle: &str, index: usize) -> Result<Asset> {
        let processors = self.processors.iter().cloned();
        match (&self.file, &self.content) {
            (Some(file), None) => {
                let asset = Asset::file(file.clone(), processors)?;
                Ok(match self.kind {
                    Some(kind) => asset.with_kind(kind),
                    None => asset,
                })
            }
            (None, Some(content)) => Ok(Asset::new(content.as_str(), processors)),
            _ => Err(Error::Config(format!(
                "bundle `{bundle}` asset {index}: set exactly one of `file` or `content`"
            ))),
        }
    }
}
