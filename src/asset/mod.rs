//! Assets: one unit of content plus its own processor chain.
//!
//! An asset is immutable once built. Its version token hashes the *raw*
//! bytes, so fixing a processor never changes the token; processed output is
//! recomputed per operation and memoized only in the operation's cache.

mod kind;

pub use kind::MediaKind;

use std::path::{Path, PathBuf};

use crate::cache::{CacheKey, EntityId};
use crate::compressor::Scope;
use crate::content::{Content, ContentKind};
use crate::error::{AssetSourceError, Result};
use crate::hash::ContentHash;
use crate::storage::Storage;

/// Where an asset's raw bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Inline(Content),
    /// Relative name resolved by the [`Storage`] collaborator on every read.
    File(PathBuf),
}

#[derive(Debug)]
pub struct Asset {
    id: EntityId,
    source: AssetSource,
    processors: Vec<String>,
    kind: ContentKind,
}

/// A clone is a new entity: it gets its own id and so its own cache slots.
impl Clone for Asset {
    fn clone(&self) -> Self {
        Self {
            id: EntityId::next(),
            source: self.source.clone(),
            processors: self.processors.clone(),
            kind: self.kind,
        }
    }
}

impl Asset {
    /// Asset with literal content.
    pub fn new(
        content: impl Into<Content>,
        processors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let content = content.into();
        let kind = content.kind();
        Self {
            id: EntityId::next(),
            source: AssetSource::Inline(content),
            processors: processors.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// File-backed asset, read through storage at access time.
    ///
    /// Absolute paths are rejected here, before any I/O happens. The content
    /// kind is inferred from the extension; see [`Asset::with_kind`].
    pub fn file(
        path: impl Into<PathBuf>,
        processors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let path = path.into();
        if path.is_absolute() {
            return Err(AssetSourceError::AbsolutePath(path).into());
        }
        let kind = ContentKind::from_path(&path);
        Ok(Self {
            id: EntityId::next(),
            source: AssetSource::File(path),
            processors: processors.into_iter().map(Into::into).collect(),
            kind,
        })
    }

    /// Declare the content kind of a file-backed asset.
    ///
    /// Inline assets always take the kind of their literal.
    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        if matches!(self.source, AssetSource::File(_)) {
            self.kind = kind;
        }
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn processors(&self) -> &[String] {
        &self.processors
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Unprocessed content. File-backed assets hit storage on every call.
    pub fn raw_content(&self, storage: &dyn Storage) -> Result<Content> {
        match &self.source {
            AssetSource::Inline(content) => Ok(content.clone()),
            AssetSource::File(path) => {
                let bytes = storage.read(path)?;
                Content::decode(bytes, self.kind)
                    .ok_or_else(|| AssetSourceError::Encoding(path.clone()).into())
            }
        }
    }

    /// Content with the asset's chain applied left to right, or raw content
    /// when `apply_processors` is false. Memoized in the scope's cache.
    pub fn content(&self, scope: &mut Scope<'_>, apply_processors: bool) -> Result<Content> {
        let key = CacheKey::new(self.id, apply_processors);
        if let Some(cached) = scope.cache_mut().get(&key) {
            return Ok(cached);
        }

        let raw = self.raw_content(scope.storage())?;
        let content = if apply_processors && !self.processors.is_empty() {
            let text = raw.into_text()?;
            Content::Text(scope.processors().apply_chain(&self.processors, text)?)
        } else {
            raw
        };

        scope.cache_mut().insert(key, content.clone());
        Ok(content)
    }

    /// [`Asset::content`] as text; fails on binary content.
    pub fn text(&self, scope: &mut Scope<'_>, apply_processors: bool) -> Result<String> {
        self.content(scope, apply_processors)?.into_text()
    }

    /// Digest of the raw bytes, recomputed on every call.
    pub fn hash(&self, storage: &dyn Storage) -> Result<ContentHash> {
        match &self.source {
            AssetSource::Inline(content) => Ok(ContentHash::of(content.as_bytes())),
            AssetSource::File(path) => Ok(ContentHash::of(storage.read(path)?)),
        }
    }

    /// Relative file name, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            AssetSource::File(path) => Some(path),
            AssetSource::Inline(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{OnConflict, ProcessorRegistry};
    use crate::storage::FsStorage;
    use crate::error::Error;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const CSS: &str = r#"
            html {
                background-color: red;
            }
        "#;

    fn processor1(content: &str) -> anyhow::Result<String> {
        Ok(content.replace("html", " body "))
    }

    fn processor2(content: &str) -> anyhow::Result<String> {
        Ok(content.replace(" body ", "p "))
    }

    fn registry() -> ProcessorRegistry {
        let registry = ProcessorRegistry::new();
        registry.register(processor1, None, OnConflict::Reject).unwrap();
        registry.register(processor2, None, OnConflict::Reject).unwrap();
        registry
    }

    #[test]
    fn test_raw_content() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let asset = Asset::new(CSS, ["cssmin"]);
        assert_eq!(asset.raw_content(&storage).unwrap(), Content::from(CSS));
    }

    #[test]
    fn test_content() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = registry();
        let mut scope = Scope::new(&storage, registry.snapshot(), "");

        let asset = Asset::new(CSS, ["cssmin"]);
        assert_eq!(asset.text(&mut scope, true).unwrap(), "html{background-color:red}");
        assert_eq!(asset.text(&mut scope, false).unwrap(), CSS);
    }

    #[test]
    fn test_processor_order_matters() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = registry();
        let mut scope = Scope::new(&storage, registry.snapshot(), "");

        let css = "html { background-color: red; } ";
        let forward = Asset::new(css, ["processor1", "processor2"]);
        let backward = Asset::new(css, ["processor2", "processor1"]);

        assert_eq!(
            forward.text(&mut scope, true).unwrap(),
            "p  { background-color: red; } "
        );
        assert_eq!(
            backward.text(&mut scope, true).unwrap(),
            " body  { background-color: red; } "
        );
    }

    #[test]
    fn test_unknown_processor() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = ProcessorRegistry::new();
        let mut scope = Scope::new(&storage, registry.snapshot(), "");

        let err = Asset::new("x", ["nope"]).content(&mut scope, true).unwrap_err();
        assert!(matches!(err, Error::ProcessorNotFound(_)));
        // Raw content does not need the chain
        assert!(Asset::new("x", ["nope"]).content(&mut scope, false).is_ok());
    }

    #[test]
    fn test_content_is_memoized_per_scope() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = ProcessorRegistry::empty();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry
            .register(
                move |c: &str| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(c.to_uppercase())
                },
                Some("upper"),
                OnConflict::Reject,
            )
            .unwrap();

        let asset = Asset::new("abc", ["upper"]);
        let mut scope = Scope::new(&storage, registry.snapshot(), "");
        assert_eq!(asset.text(&mut scope, true).unwrap(), "ABC");
        assert_eq!(asset.text(&mut scope, true).unwrap(), "ABC");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let mut next = Scope::new(&storage, registry.snapshot(), "");
        assert_eq!(asset.text(&mut next, true).unwrap(), "ABC");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clone_is_a_new_entity() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = ProcessorRegistry::new();
        let mut scope = Scope::new(&storage, registry.snapshot(), "");

        let asset = Asset::new("abc", Vec::<String>::new());
        let copy = asset.clone();
        assert_ne!(asset.id(), copy.id());

        asset.content(&mut scope, true).unwrap();
        copy.content(&mut scope, true).unwrap();
        assert_eq!(scope.cache().len(), 2);
    }

    #[test]
    fn test_absolute_filename() {
        let err = Asset::file("/tmp/foobar", Vec::<String>::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::AssetSource(AssetSourceError::AbsolutePath(_))
        ));
        assert!(err.to_string().contains("absolute filenames are not supported"));
    }

    #[test]
    fn test_file_asset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style.css"), CSS).unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = registry();
        let mut scope = Scope::new(&storage, registry.snapshot(), "");

        let asset = Asset::file("style.css", ["cssmin"]).unwrap();
        assert_eq!(asset.kind(), ContentKind::Text);
        assert_eq!(asset.raw_content(&storage).unwrap(), Content::from(CSS));
        assert_eq!(asset.text(&mut scope, true).unwrap(), "html{background-color:red}");
        assert_eq!(asset.path(), Some(Path::new("style.css")));
    }

    #[test]
    fn test_file_hash_follows_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "console.log(1)").unwrap();
        let storage = FsStorage::new(dir.path());

        let asset = Asset::file("app.js", Vec::<String>::new()).unwrap();
        let v1 = asset.hash(&storage).unwrap();
        assert_eq!(v1, asset.hash(&storage).unwrap());
        assert_eq!(v1, ContentHash::of("console.log(1)"));

        fs::write(&file, "console.log(2)").unwrap();
        assert_ne!(v1, asset.hash(&storage).unwrap());
    }

    #[test]
    fn test_hash_ignores_processors() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let plain = Asset::new("same", Vec::<String>::new());
        let processed = Asset::new("same", ["cssmin"]);
        assert_eq!(plain.hash(&storage).unwrap(), processed.hash(&storage).unwrap());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());
        let asset = Asset::file("gone.css", Vec::<String>::new()).unwrap();
        let err = asset.raw_content(&storage).unwrap_err();
        assert!(matches!(err, Error::AssetSource(AssetSourceError::NotFound(_))));
    }

    #[test]
    fn test_binary_file_asset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        let storage = FsStorage::new(dir.path());
        let registry = ProcessorRegistry::new();
        let mut scope = Scope::new(&storage, registry.snapshot(), "");

        let asset = Asset::file("logo.png", Vec::<String>::new()).unwrap();
        assert_eq!(asset.kind(), ContentKind::Binary);
        assert_eq!(
            asset.content(&mut scope, true).unwrap(),
            Content::Binary(vec![0x89, b'P', b'N', b'G'])
        );

        let with_chain = Asset::file("logo.png", ["cssmin"]).unwrap();
        let err = with_chain.content(&mut scope, true).unwrap_err();
        assert!(matches!(err, Error::BinaryContent));
    }

    #[test]
    fn test_declared_kind() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.bin"), "plain words").unwrap();
        let storage = FsStorage::new(dir.path());

        let asset = Asset::file("data.bin", Vec::<String>::new())
            .unwrap()
            .with_kind(ContentKind::Text);
        assert_eq!(asset.raw_content(&storage).unwrap(), Content::from("plain words"));

        let inline = Asset::new("x", Vec::<String>::new()).with_kind(ContentKind::Binary);
        assert_eq!(inline.kind(), ContentKind::Text);
    }
}
