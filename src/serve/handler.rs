//! Fetch state machine for versioned URLs, independent of the HTTP transport.

use super::route::Route;
use crate::asset::MediaKind;
use crate::compressor::{Compressor, Scope};
use crate::content::Content;
use crate::error::{Error, Result};
use crate::hash::ContentHash;
use crate::utils::{html, mime::types};
use crate::{debug, log};

/// A response ready to be written by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Content-addressed, may be cached forever.
    pub immutable: bool,
}

impl Reply {
    fn ok(kind: MediaKind, content: Content) -> Self {
        Self {
            status: 200,
            content_type: kind.mime(),
            body: content.into_bytes(),
            immutable: true,
        }
    }

    pub fn not_found() -> Self {
        Self::plain(404, "404 Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::plain(405, "405 Method Not Allowed")
    }

    pub fn unavailable() -> Self {
        Self::plain(503, "503 Service Unavailable")
    }

    fn server_error(error: &Error) -> Self {
        use std::fmt::Write;

        let mut message = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            let _ = write!(message, "\n  caused by: {cause}");
            source = cause.source();
        }
        let msg = html::escape(&message);
        Self {
            status: 500,
            content_type: types::HTML,
            body: format!("<html><body><h1>Processing Error</h1><pre>{msg}</pre></body></html>")
                .into_bytes(),
            immutable: false,
        }
    }

    fn plain(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: types::PLAIN,
            body: body.as_bytes().to_vec(),
            immutable: false,
        }
    }
}

/// Answer a `GET` for `url`.
///
/// Unknown names, out-of-range indices, stale or forged tokens and wrong
/// extensions all become `404`. Only processor or storage failures are `500`.
pub fn handle(compressor: &Compressor, url: &str) -> Reply {
    let Some(route) = Route::from_url(url, compressor.prefix()) else {
        debug!("serve"; "404 {url}: not a versioned route");
        return Reply::not_found();
    };

    let mut scope = compressor.scope();
    match fetch(compressor, &mut scope, &route) {
        Ok((kind, content)) => Reply::ok(kind, content),
        Err(e) if e.is_not_found() => {
            debug!("serve"; "404 {url}: {e}");
            Reply::not_found()
        }
        Err(e) => {
            log!("error"; "{url}: {e}");
            Reply::server_error(&e)
        }
    }
}

/// Resolve a route to the processed content it names.
pub fn fetch(
    compressor: &Compressor,
    scope: &mut Scope<'_>,
    route: &Route,
) -> Result<(MediaKind, Content)> {
    let bundle = compressor.bundles().get(&route.bundle)?;
    let kind = bundle.kind();

    if !kind.accepts_extension(&route.extension) {
        return Err(Error::ExtensionMismatch {
            expected: kind.extension().to_string(),
            found: route.extension.clone(),
        });
    }

    match route.asset {
        Some(index) => {
            let asset = bundle.get_asset(index).ok_or_else(|| Error::AssetNotFound {
                bundle: route.bundle.clone(),
                index,
            })?;
            check_token(&asset.hash(scope.storage())?, &route.token)?;
            Ok((kind, asset.content(scope, true)?))
        }
        None => {
            check_token(&bundle.hash(scope.storage())?, &route.token)?;
            Ok((kind, Content::Text(bundle.get_content(scope, true)?)))
        }
    }
}

fn check_token(current: &ContentHash, token: &str) -> Result<()> {
    if current.matches_token(token) {
        Ok(())
    } else {
        Err(Error::VersionMismatch {
            expected: current.token(),
            found: token.to_string(),
        })
    }
}
