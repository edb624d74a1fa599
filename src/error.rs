//! Error types for registration, lookup, content resolution and serving.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("processor `{0}` is already registered")]
    DuplicateProcessor(String),

    #[error("bundle `{0}` is already registered")]
    DuplicateBundle(String),

    #[error("processor `{0}` not found")]
    ProcessorNotFound(String),

    #[error("bundle `{0}` not found")]
    BundleNotFound(String),

    #[error("bundle `{bundle}` has no asset at index {index}")]
    AssetNotFound { bundle: String, index: usize },

    #[error(transparent)]
    AssetSource(#[from] AssetSourceError),

    #[error("version mismatch: expected `{expected}`, found `{found}`")]
    VersionMismatch { expected: String, found: String },

    #[error("extension `.{found}` does not match `.{expected}`")]
    ExtensionMismatch { expected: String, found: String },

    #[error("cannot derive a processor name from `{0}`, pass an explicit name")]
    UnnamedProcessor(String),

    #[error("processor `{name}` failed")]
    Processor {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("asset content is binary and cannot be used as text")]
    BinaryContent,

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Errors that a fetch translates into `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BundleNotFound(_)
                | Self::AssetNotFound { .. }
                | Self::VersionMismatch { .. }
                | Self::ExtensionMismatch { .. }
                | Self::AssetSource(AssetSourceError::NotFound(_))
        )
    }

    /// Both kinds of name collision.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateProcessor(_) | Self::DuplicateBundle(_))
    }
}

/// Failure to resolve the raw bytes of a file-backed asset.
#[derive(Debug, Error)]
pub enum AssetSourceError {
    #[error("absolute filenames are not supported: `{0}`")]
    AbsolutePath(PathBuf),

    #[error("asset file `{0}` not found")]
    NotFound(PathBuf),

    #[error("IO error when reading `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("asset file `{0}` is not valid UTF-8")]
    Encoding(PathBuf),
}
