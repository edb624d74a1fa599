//! Inline and linked markup for bundles.

use super::{Bundle, SEPARATOR};
use crate::asset::MediaKind;
use crate::compressor::Scope;
use crate::error::Result;
use crate::serve::route::encode_name;
use crate::utils::html::escape_attr;

/// How a bundle is emitted into a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderMode {
    /// Embed content instead of linking to a versioned URL.
    pub inline: bool,
    /// One tag for the whole bundle instead of one per asset.
    pub concatenate: bool,
}

impl RenderMode {
    pub const INLINE: Self = Self {
        inline: true,
        concatenate: true,
    };

    pub const LINKED: Self = Self {
        inline: false,
        concatenate: true,
    };

    /// Same mode, one tag per asset.
    pub const fn split(self) -> Self {
        Self {
            concatenate: false,
            ..self
        }
    }
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::INLINE
    }
}

impl Bundle {
    pub fn render(&self, scope: &mut Scope<'_>, mode: RenderMode) -> Result<String> {
        if mode.inline {
            self.get_inline_content(scope, mode.concatenate)
        } else {
            self.get_linked_content(scope, mode.concatenate)
        }
    }

    /// Content embedded in the page.
    ///
    /// Concatenated: the fully processed bundle in one tag. Split: one tag per
    /// asset holding that asset's own processed content, without the bundle
    /// chain. Generic bundles have no wrapping tag.
    pub fn get_inline_content(&self, scope: &mut Scope<'_>, concatenate: bool) -> Result<String> {
        if concatenate {
            let content = self.get_content(scope, true)?;
            return Ok(inline_tag(self.kind, &content));
        }

        let tags: Vec<_> = self
            .get_contents(scope, true)?
            .iter()
            .map(|content| inline_tag(self.kind, content))
            .collect();
        Ok(tags.join(SEPARATOR))
    }

    /// Tags pointing at versioned URLs.
    pub fn get_linked_content(&self, scope: &mut Scope<'_>, concatenate: bool) -> Result<String> {
        let prefix = scope.prefix();
        let storage = scope.storage();

        if concatenate {
            let url = self.url(prefix, &self.hash(storage)?.token());
            return Ok(link_tag(self.kind, &url));
        }

        let mut tags = Vec::with_capacity(self.assets.len());
        for (index, asset) in self.assets.iter().enumerate() {
            let url = self.asset_url(prefix, index, &asset.hash(storage)?.token());
            tags.push(link_tag(self.kind, &url));
        }
        Ok(tags.join(SEPARATOR))
    }

    /// `<prefix>/bundle/<name>_v<token>.<ext>`
    pub fn url(&self, prefix: &str, token: &str) -> String {
        format!(
            "{prefix}/bundle/{}_v{token}.{}",
            encode_name(&self.name),
            self.kind.extension()
        )
    }

    /// `<prefix>/bundle/<name>/asset/<index>_v<token>.<ext>`
    pub fn asset_url(&self, prefix: &str, index: usize, token: &str) -> String {
        format!(
            "{prefix}/bundle/{}/asset/{index}_v{token}.{}",
            encode_name(&self.name),
            self.kind.extension()
        )
    }
}

fn inline_tag(kind: MediaKind, content: &str) -> String {
    match kind {
        MediaKind::Generic => content.to_string(),
        MediaKind::Script => format!(r#"<script type="{}">{content}</script>"#, kind.tag_type()),
        MediaKind::Style => format!(r#"<style type="{}">{content}</style>"#, kind.tag_type()),
    }
}

fn link_tag(kind: MediaKind, url: &str) -> String {
    let url = escape_attr(url);
    match kind {
        MediaKind::Generic => {
            format!(r#"<link rel="external" href="{url}" type="{}">"#, kind.tag_type())
        }
        MediaKind::Script => {
            format!(r#"<script type="{}" src="{url}"></script>"#, kind.tag_type())
        }
        MediaKind::Style => {
            format!(r#"<link type="{}" rel="stylesheet" href="{url}">"#, kind.tag_type())
        }
    }
}
