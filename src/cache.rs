//! Time-boxed permission cache.
//!
//! A small in-memory cache mapping a subject identifier to that
//! subject's full per-scope permission map, used to avoid a store
//! round-trip on every check. Entries expire after a single global TTL;
//! expiry is checked lazily at read time, so there is no background
//! eviction task.
//!
//! The cache is not transactionally linked to the store. Any caller that
//! mutates a subject's permissions through the store must call
//! [`PermissionCache::invalidate`] (or repopulate via
//! [`PermissionCache::set`]) for that subject before reporting success;
//! skipping that leaves a staleness window bounded by the TTL.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

struct CacheEntry {
    permissions: HashMap<String, u32>,
    inserted_at: Instant,
}

/// TTL cache of per-subject permission maps.
///
/// Safe for concurrent `get`/`set`/`invalidate` from multiple in-flight
/// checks.
pub struct PermissionCache<S: Eq + Hash> {
    entries: DashMap<S, CacheEntry>,
    ttl: Duration,
}

impl<S: Eq + Hash> PermissionCache<S> {
    /// Create a cache whose entries live for `ttl`.
    ///
    /// A zero TTL disables caching entirely: `set` becomes a no-op and
    /// `get` never returns a value.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Store a subject's full permission map, replacing any prior entry.
    pub fn set(&self, subject: S, permissions: HashMap<String, u32>) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            subject,
            CacheEntry {
                permissions,
                inserted_at: Instant::now(),
            },
        );
    }

    /// The subject's permission map, if present and fresh.
    ///
    /// Expired entries are evicted on read and reported as absent; the
    /// caller cannot distinguish "expired" from "never set".
    pub fn get(&self, subject: &S) -> Option<HashMap<String, u32>> {
        let expired = match self.entries.get(subject) {
            Some(entry) => {
                if entry.inserted_at.elapsed() < self.ttl {
                    trace!("cache hit");
                    return Some(entry.permissions.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            // Read-time eviction; the guard above is dropped already.
            self.entries.remove(subject);
            trace!("cache entry expired");
        } else {
            trace!("cache miss");
        }
        None
    }

    /// Remove a subject's entry. Succeeds whether or not one exists.
    pub fn invalidate(&self, subject: &S) {
        self.entries.remove(subject);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently held, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissions(level: u32) -> HashMap<String, u32> {
        let mut map = HashMap::new();
        map.insert("tasks".to_string(), level);
        map
    }

    #[test]
    fn test_set_and_get() {
        let cache: PermissionCache<u64> = PermissionCache::new(Duration::from_secs(60));
        cache.set(1, permissions(3));

        let cached = cache.get(&1).unwrap();
        assert_eq!(cached.get("tasks"), Some(&3));
        assert!(cache.get(&2).is_none());
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let cache: PermissionCache<u64> = PermissionCache::new(Duration::ZERO);
        cache.set(1, permissions(3));
        assert!(cache.get(&1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_is_absent_and_evicted() {
        let cache: PermissionCache<u64> = PermissionCache::new(Duration::from_nanos(1));
        cache.set(1, permissions(3));
        std::thread::sleep(Duration::from_millis(1));

        assert!(cache.get(&1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let cache: PermissionCache<u64> = PermissionCache::new(Duration::from_secs(60));
        cache.set(1, permissions(3));
        let mut replacement = HashMap::new();
        replacement.insert("reports".to_string(), 1u32);
        cache.set(1, replacement);

        let cached = cache.get(&1).unwrap();
        assert!(cached.get("tasks").is_none());
        assert_eq!(cached.get("reports"), Some(&1));
    }

    #[test]
    fn test_invalidate_absent_key() {
        let cache: PermissionCache<u64> = PermissionCache::new(Duration::from_secs(60));
        cache.invalidate(&42);
    }

    #[test]
    fn test_clear() {
        let cache: PermissionCache<u64> = PermissionCache::new(Duration::from_secs(60));
        cache.set(1, permissions(1));
        cache.set(2, permissions(2));
        cache.clear();
        assert!(cache.get(&1).is_none());
        assert!(cache.get(&2).is_none());
    }
}
