//! Request-scoped memoization of computed content.
//!
//! One [`ContentCache`] lives inside one [`Scope`](crate::Scope) and is
//! dropped with it. Nothing here is shared between requests, so no locking.

use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use crate::content::Content;
use crate::debug;

/// Identity of an asset or bundle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub entity: EntityId,
    pub apply_processors: bool,
}

impl CacheKey {
    pub const fn new(entity: EntityId, apply_processors: bool) -> Self {
        Self {
            entity,
            apply_processors,
        }
    }
}

#[derive(Debug, Default)]
pub struct ContentCache {
    entries: FxHashMap<CacheKey, Content>,
    hits: usize,
    misses: usize,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Content> {
        match self.entries.get(key) {
            Some(content) => {
                self.hits += 1;
                debug!("cache"; "hit {:?}", key);
                Some(content.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, content: Content) {
        self.entries.insert(key, content);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
