//! Content values flowing through the pipeline.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::utils::mime;

/// Whether an asset's bytes are meant to be treated as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Text,
    Binary,
}

impl ContentKind {
    /// Infer from a file name via the MIME table.
    pub fn from_path(path: &Path) -> Self {
        if mime::is_text(mime::from_path(path)) {
            Self::Text
        } else {
            Self::Binary
        }
    }
}

/// Raw or processed content of an asset or bundle.
///
/// Processors only ever see [`Content::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

impl Content {
    /// Decode `bytes` according to `kind`.
    ///
    /// Returns `None` if a text asset is not valid UTF-8.
    pub fn decode(bytes: Vec<u8>, kind: ContentKind) -> Option<Self> {
        match kind {
            ContentKind::Text => String::from_utf8(bytes).ok().map(Self::Text),
            ContentKind::Binary => Some(Self::Binary(bytes)),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Binary(_) => ContentKind::Binary,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    pub fn as_text(&self) -> Result<&str> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Binary(_) => Err(Error::BinaryContent),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Binary(_) => Err(Error::BinaryContent),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(s) => s.into_bytes(),
            Self::Binary(b) => b,
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<u8>> for Content {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}
