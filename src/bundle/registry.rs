//! Name → bundle mapping.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::Bundle;
use crate::debug;
use crate::error::{Error, Result};
use crate::processor::OnConflict;

type BundleMap = FxHashMap<String, Arc<Bundle>>;

/// Registered bundles, looked up by name for the lifetime of the process.
///
/// Readers load the current map without locking; a registration builds a new
/// map and swaps it in whole.
pub struct BundleRegistry {
    map: ArcSwap<BundleMap>,
    write: Mutex<()>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self {
            map: ArcSwap::from_pointee(BundleMap::default()),
            write: Mutex::new(()),
        }
    }

    pub fn register(&self, bundle: Bundle, on_conflict: OnConflict) -> Result<Arc<Bundle>> {
        let _guard = self.write.lock();
        let current = self.map.load();
        if on_conflict == OnConflict::Reject && current.contains_key(bundle.name()) {
            return Err(Error::DuplicateBundle(bundle.name().to_string()));
        }

        debug!(
            "bundle";
            "register `{}` ({} assets, {:?})",
            bundle.name(),
            bundle.assets().len(),
            on_conflict
        );
        let bundle = Arc::new(bundle);
        let mut next = BundleMap::clone(&current);
        next.insert(bundle.name().to_string(), Arc::clone(&bundle));
        self.map.store(Arc::new(next));
        Ok(bundle)
    }

    pub fn get(&self, name: &str) -> Result<Arc<Bundle>> {
        self.map
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::BundleNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.load().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.map.load().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.load().is_empty()
    }
}

impl Default for BundleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
