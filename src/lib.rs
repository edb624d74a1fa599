//! Compressor - named bundles of static content served under content-hashed URLs.
//!
//! A [`Bundle`] groups [`Asset`]s. Each asset carries its own chain of named
//! processors, and the bundle carries a second chain applied to the joined
//! output. Bundles render as inline markup or as links to versioned URLs
//! (`<prefix>/bundle/<name>_v<hash>.<ext>`), which the [`serve`] layer answers
//! with `200` or `404` depending on whether the version token still matches.
//!
//! ```ignore
//! let compressor = Compressor::new(FsStorage::new("static"));
//! compressor.processors().register(shout, None, OnConflict::Reject)?;
//! compressor.bundles().register(
//!     Bundle::style("site")
//!         .asset(Asset::file("css/base.css", ["shout"])?)
//!         .with_processors(["cssmin"]),
//!     OnConflict::Reject,
//! )?;
//!
//! let mut scope = compressor.scope();
//! let html = compressor.render(&mut scope, "site", RenderMode::LINKED)?;
//! ```

pub mod logger;

pub mod asset;
pub mod bundle;
pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod hash;
pub mod processor;
pub mod serve;
pub mod storage;
pub mod utils;

mod compressor;

pub use asset::{Asset, AssetSource, MediaKind};
pub use bundle::{Bundle, BundleRegistry, RenderMode};
pub use cache::{CacheKey, ContentCache};
pub use compressor::{Compressor, Scope};
pub use content::{Content, ContentKind};
pub use error::{AssetSourceError, Error, Result};
pub use hash::ContentHash;
pub use processor::{OnConflict, Processor, ProcessorRegistry};
pub use storage::{FsStorage, Storage};
