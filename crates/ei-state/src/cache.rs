//! Keyed response cache with a per-instance time-to-live.
//!
//! Entries are valid while `now - stored_at < ttl`. Expired entries read as
//! absent and are overwritten by the next insert; nothing sweeps them.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Whether a value came from the cache or from the fetch closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            Some(&entry.value)
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, stored_at: Instant) {
        self.entries.insert(key, CacheEntry { value, stored_at });
    }

    /// Entries held, including expired ones not yet overwritten.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// Serve `key` from the cache, or run `fetch` and store its value.
    /// Errors are returned as-is and never stored.
    pub fn fetch_through_at<E>(
        &mut self,
        key: K,
        now: Instant,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<(V, CacheStatus), E> {
        if let Some(value) = self.get_at(&key, now) {
            return Ok((value.clone(), CacheStatus::Hit));
        }
        let value = fetch()?;
        self.insert_at(key, value.clone(), now);
        Ok((value, CacheStatus::Miss))
    }

    pub fn fetch_through<E>(
        &mut self,
        key: K,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<(V, CacheStatus), E> {
        self.fetch_through_at(key, Instant::now(), fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MIN: Duration = Duration::from_secs(5 * 60);

    #[test]
    fn hit_within_ttl_and_miss_after() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(FIVE_MIN);
        cache.insert_at("1-10".to_string(), 7, t0);

        assert_eq!(cache.get_at(&"1-10".to_string(), t0), Some(&7));
        assert_eq!(
            cache.get_at(&"1-10".to_string(), t0 + Duration::from_secs(299)),
            Some(&7)
        );
        assert_eq!(cache.get_at(&"1-10".to_string(), t0 + FIVE_MIN), None);
        assert_eq!(
            cache.get_at(&"1-10".to_string(), t0 + Duration::from_secs(301)),
            None
        );
    }

    #[test]
    fn insert_overwrites_and_refreshes_timestamp() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(FIVE_MIN);
        cache.insert_at("k", 1, t0);
        let later = t0 + Duration::from_secs(400);
        cache.insert_at("k", 2, later);
        assert_eq!(cache.get_at(&"k", later + Duration::from_secs(10)), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fetch_through_skips_fetch_on_hit() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(FIVE_MIN);
        let mut calls = 0;

        let (v, status) = cache
            .fetch_through_at("2023-NY", t0, || {
                calls += 1;
                Ok::<_, String>(10)
            })
            .unwrap();
        assert_eq!((v, status), (10, CacheStatus::Miss));

        let (v, status) = cache
            .fetch_through_at("2023-NY", t0 + Duration::from_secs(60), || {
                calls += 1;
                Ok::<_, String>(11)
            })
            .unwrap();
        assert_eq!((v, status), (10, CacheStatus::Hit));
        assert_eq!(calls, 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let t0 = Instant::now();
        let mut cache: TtlCache<&str, i32> = TtlCache::new(FIVE_MIN);
        let err = cache.fetch_through_at("k", t0, || Err::<i32, _>("boom"));
        assert_eq!(err, Err("boom"));
        assert!(cache.is_empty());
    }
}
