use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use crate::index::ReverseKind;
use crate::model::Region;

type LookupKey = (Region, ReverseKind, i64);

/// Thread-safe LRU cache of reverse index lookups
///
/// Keyed by `(region, kind, id)`. Empty results are cached too, since most
/// ids have no referrers and those misses are the common case.
pub struct ReverseLookupCache {
    cache: Mutex<LruCache<LookupKey, Vec<i64>>>,
}

impl ReverseLookupCache {
    /// Create a cache holding at most `capacity` lookups (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, LruCache<LookupKey, Vec<i64>>> {
        // LruCache updates are not observable half-done, so a poisoned lock is still usable.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached referrer ids, refreshing the entry's recency
    pub fn get(&self, region: Region, kind: ReverseKind, id: i64) -> Option<Vec<i64>> {
        self.guard().get(&(region, kind, id)).cloned()
    }

    pub fn put(&self, region: Region, kind: ReverseKind, id: i64, ids: Vec<i64>) {
        self.guard().put((region, kind, id), ids);
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}
