//! `compressor.toml` configuration.
//!
//! ```toml
//! [serve]
//! port = 5278
//!
//! [storage]
//! root = "static"
//!
//! [[bundle]]
//! name = "site"
//! kind = "style"
//! ```
//!
//! Unknown keys are reported as warnings and otherwise ignored.

mod bundle;
mod serve;

pub use bundle::{AssetConfig, BundleConfig};
pub use serve::ServeConfig;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::log;

/// Default config file name.
pub const CONFIG_FILE: &str = "compressor.toml";

/// `[storage]` section: where file-backed assets are read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Relative paths resolve against the config file's directory.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serve: ServeConfig,
    pub storage: StorageConfig,
    pub bundle: Vec<BundleConfig>,

    /// Path the config was loaded from (empty when parsed from a string).
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Config {
    /// Load from a file, warning about unknown fields.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("IO error when reading `{}`", path.display()))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Storage root, resolved against the config file's directory.
    pub fn storage_root(&self) -> PathBuf {
        if self.storage.root.is_absolute() {
            return self.storage.root.clone();
        }
        match self.config_path.parent() {
            Some(dir) => dir.join(&self.storage.root),
            None => self.storage.root.clone(),
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
