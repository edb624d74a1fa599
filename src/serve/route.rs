//! Versioned URL grammar.
//!
//! ```text
//! <prefix>/bundle/<name>_v<token>.<ext>
//! <prefix>/bundle/<name>/asset/<index>_v<token>.<ext>
//! ```
//!
//! `<name>` is percent-encoded, so any bundle name (spaces, `/`, `?`,
//! non-ASCII) survives the round trip through a browser.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything but unreserved characters (RFC 3986).
const NAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Prefix versioned routes are mounted under by default.
pub const DEFAULT_PREFIX: &str = "/_compressor";

/// A parsed fetch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub bundle: String,
    pub asset: Option<usize>,
    pub token: String,
    pub extension: String,
}

impl Route {
    /// Parse a request URL mounted under `prefix`. Query strings are ignored.
    pub fn from_url(url: &str, prefix: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let path = path.strip_prefix(prefix)?;
        Self::parse(path.strip_prefix('/')?)
    }

    /// Parse a path relative to the prefix, starting at `bundle/`.
    ///
    /// The name is decoded after the path is split, so an encoded `/` stays
    /// part of the name.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix("bundle/")?;
        let (bundle, file) = match rest.split_once("/asset/") {
            Some((name, file)) => (Some(name), file),
            None => (None, rest),
        };

        let (stem, extension) = file.rsplit_once('.')?;
        let (head, token) = stem.rsplit_once("_v")?;
        if head.is_empty() || token.is_empty() || extension.is_empty() || file.contains('/') {
            return None;
        }

        let (bundle, asset) = match bundle {
            Some(name) => (name, Some(parse_index(head)?)),
            None => (head, None),
        };
        if bundle.is_empty() || bundle.contains('/') {
            return None;
        }
        let bundle = percent_decode_str(bundle).decode_utf8().ok()?;

        Some(Self {
            bundle: bundle.into_owned(),
            asset,
            token: token.to_string(),
            extension: extension.to_string(),
        })
    }
}

/// Encode a bundle name for use as one URL path segment.
pub fn encode_name(name: &str) -> Cow<'_, str> {
    utf8_percent_encode(name, NAME_SEGMENT).into()
}

fn parse_index(s: &str) -> Option<usize> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
