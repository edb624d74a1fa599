//! Raw byte retrieval for file-backed assets.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::AssetSourceError;

/// Source of raw bytes for file-backed assets, keyed by relative name.
///
/// Absolute names never reach an implementation: assets reject them first.
pub trait Storage: Send + Sync {
    fn read(&self, name: &Path) -> Result<Vec<u8>, AssetSourceError>;
}

/// Reads files below a root directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Storage for FsStorage {
    fn read(&self, name: &Path) -> Result<Vec<u8>, AssetSourceError> {
        // `..` would walk out of the root just like an absolute path.
        let escapes = name.is_absolute()
            || name
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AssetSourceError::AbsolutePath(name.to_path_buf()));
        }

        let path = self.root.join(name);
        fs::read(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => AssetSourceError::NotFound(name.to_path_buf()),
            _ => AssetSourceError::Read(path, err),
        })
    }
}
