//! Bounded cache of commit-level tree diffs

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;

use crate::models::TreeDiff;

/// Identity of a cached tree diff.
///
/// `parent` holds the explicit parent OID, or the empty string when the diff
/// was computed against the first parent (or no parent for a root commit),
/// so an explicit-parent query is never answered with a first-parent entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffKey {
    target: git2::Oid,
    parent: String,
}

impl DiffKey {
    pub fn new(target: git2::Oid, parent: Option<git2::Oid>) -> Self {
        Self {
            target,
            parent: parent.map(|p| p.to_string()).unwrap_or_default(),
        }
    }

    pub fn target(&self) -> git2::Oid {
        self.target
    }

    pub fn is_first_parent(&self) -> bool {
        self.parent.is_empty()
    }
}

/// LRU map from [`DiffKey`] to a computed [`TreeDiff`].
///
/// Commits are immutable, so entries never go stale and there is no
/// invalidation hook; eviction happens only under capacity pressure.
/// Concurrent fills of the same key are tolerated and the last write wins.
pub struct DiffCache {
    entries: Mutex<LruCache<DiffKey, Arc<TreeDiff>>>,
}

impl DiffCache {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &DiffKey) -> Option<Arc<TreeDiff>> {
        self.lock().get(key).cloned()
    }

    pub fn put(&self, key: DiffKey, diff: Arc<TreeDiff>) {
        self.lock().put(key, diff);
    }

    pub fn contains(&self, key: &DiffKey) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<DiffKey, Arc<TreeDiff>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DiffCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
