//! Media kinds of bundles.

use serde::Deserialize;

use crate::utils::mime::types;

/// What a bundle's content is, which drives tag shape, URL extension and
/// response MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Generic,
    Script,
    Style,
}

impl MediaKind {
    /// Extension used in versioned URLs.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Generic => "txt",
            Self::Script => "js",
            Self::Style => "css",
        }
    }

    /// `Content-Type` of fetched content.
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Generic => types::PLAIN,
            Self::Script => types::JAVASCRIPT,
            Self::Style => types::CSS,
        }
    }

    /// MIME type written into `type="..."` attributes.
    pub const fn tag_type(self) -> &'static str {
        match self {
            Self::Generic => "text/plain",
            Self::Script => "text/javascript",
            Self::Style => "text/css",
        }
    }

    /// The URL extension segment must match exactly.
    pub fn accepts_extension(self, ext: &str) -> bool {
        self.extension() == ext
    }
}
