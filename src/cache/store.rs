//! Cache Store Module
//!
//! Namespaced map of cached JSON values, each guarded by its own expiry timer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Namespace, DEFAULT_CACHE_TTL_SECS};
use crate::tasks::spawn_expiry_timer;

// == Store State ==
#[derive(Debug, Default)]
struct StoreInner {
    /// Entries per namespace
    entries: HashMap<Namespace, HashMap<String, CacheEntry>>,
    /// Last generation handed out by `set`
    generation: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl StoreInner {
    fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    fn sync_total(&mut self) {
        let total = self.len();
        self.stats.set_total_entries(total);
    }

    /// Removes `key` if it still holds the entry written at `generation`.
    fn expire(&mut self, namespace: Namespace, key: &str, generation: u64) -> bool {
        let Some(slot) = self.entries.get_mut(&namespace) else {
            return false;
        };
        if slot.get(key).map(|entry| entry.generation) != Some(generation) {
            return false;
        }
        if let Some(mut entry) = slot.remove(key) {
            // The timer running this expiry is finishing on its own
            entry.detach_timer();
        }
        self.stats.record_expiration();
        self.sync_total();
        debug!("Cache entry {}/{} expired", namespace, key);
        true
    }
}

fn lock(inner: &Mutex<StoreInner>) -> MutexGuard<'_, StoreInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Cache Store ==
/// Process-wide cache handle. Clones share the same entries.
///
/// Every stored entry carries exactly one expiry timer (when a tokio runtime
/// is available). Replacing, deleting or clearing an entry aborts its timer,
/// and an entry past its deadline is never served even if its timer has not
/// run yet.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<Mutex<StoreInner>>,
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::default())),
            ttl,
        }
    }

    /// Lifetime applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        lock(&self.inner)
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` if absent or expired.
    pub fn get(&self, namespace: Namespace, key: &str) -> Option<Value> {
        let key = namespace.normalize_key(key);
        let mut inner = self.lock();

        let lookup = inner
            .entries
            .get(&namespace)
            .and_then(|slot| slot.get(key))
            .map(|entry| (!entry.is_expired()).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                inner.stats.record_hit();
                debug!("Cache hit for {}/{}", namespace, key);
                Some(value)
            }
            Some(None) => {
                // Deadline passed before the timer got to run
                if let Some(slot) = inner.entries.get_mut(&namespace) {
                    slot.remove(key);
                }
                inner.stats.record_expiration();
                inner.stats.record_miss();
                inner.sync_total();
                debug!("Cache entry {}/{} expired on read", namespace, key);
                None
            }
            None => {
                inner.stats.record_miss();
                debug!("Cache miss for {}/{}", namespace, key);
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and its timer.
    pub fn set(&self, namespace: Namespace, key: impl Into<String>, value: Value) {
        let key = key.into();
        let key = namespace.normalize_key(&key).to_string();
        let mut inner = self.lock();

        inner.generation += 1;
        let generation = inner.generation;

        let mut entry = CacheEntry::new(value, self.ttl, generation);
        let store = Arc::downgrade(&self.inner);
        let timer_key = key.clone();
        if let Some(timer) = spawn_expiry_timer(self.ttl, move || {
            expire_from_timer(&store, namespace, &timer_key, generation)
        }) {
            entry.attach_timer(timer);
        }

        // Dropping the replaced entry aborts its timer
        let replaced = inner
            .entries
            .entry(namespace)
            .or_default()
            .insert(key.clone(), entry);
        inner.sync_total();

        debug!(
            "Cached {}/{} (generation {}, replaced: {})",
            namespace,
            key,
            generation,
            replaced.is_some()
        );
    }

    // == Delete ==
    /// Removes `key` and cancels its timer. Returns whether anything was removed.
    pub fn delete(&self, namespace: Namespace, key: &str) -> bool {
        let key = namespace.normalize_key(key);
        let mut inner = self.lock();

        let removed = inner
            .entries
            .get_mut(&namespace)
            .and_then(|slot| slot.remove(key))
            .is_some();

        if removed {
            inner.stats.record_invalidations(1);
            inner.sync_total();
            debug!("Invalidated {}/{}", namespace, key);
        }
        removed
    }

    // == Remove Where ==
    /// Removes every entry in `namespace` whose key matches `predicate`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_where<P>(&self, namespace: Namespace, mut predicate: P) -> usize
    where
        P: FnMut(&str) -> bool,
    {
        let mut inner = self.lock();

        let removed = match inner.entries.get_mut(&namespace) {
            Some(slot) => {
                let before = slot.len();
                slot.retain(|key, _| !predicate(key.as_str()));
                before - slot.len()
            }
            None => 0,
        };

        if removed > 0 {
            inner.stats.record_invalidations(removed);
            inner.sync_total();
            debug!("Invalidated {} entries in {}", removed, namespace);
        }
        removed
    }

    // == Clear ==
    /// Removes every entry in every namespace and cancels all timers.
    pub fn clear(&self) {
        let mut inner = self.lock();
        let removed = inner.len();
        inner.entries.clear();
        inner.stats.record_invalidations(removed);
        inner.sync_total();
        debug!("Cache cleared ({} entries)", removed);
    }

    /// True if a live (unexpired) entry exists. Does not touch statistics.
    pub fn contains(&self, namespace: Namespace, key: &str) -> bool {
        let key = namespace.normalize_key(key);
        self.lock()
            .entries
            .get(&namespace)
            .and_then(|slot| slot.get(key))
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Number of stored entries across all namespaces.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored entries in one namespace.
    pub fn namespace_len(&self, namespace: Namespace) -> usize {
        self.lock().entries.get(&namespace).map_or(0, HashMap::len)
    }

    /// Number of expiry timers that are still scheduled.
    pub fn pending_timers(&self) -> usize {
        self.lock()
            .entries
            .values()
            .flat_map(HashMap::values)
            .filter(|entry| entry.has_pending_timer())
            .count()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.len());
        stats
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}

fn expire_from_timer(
    store: &Weak<Mutex<StoreInner>>,
    namespace: Namespace,
    key: &str,
    generation: u64,
) {
    if let Some(inner) = store.upgrade() {
        lock(&inner).expire(namespace, key, generation);
    }
}
