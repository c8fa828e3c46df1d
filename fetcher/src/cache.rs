//! Per-instance response cache with TTL expiry.
//!
//! The cache belongs to one fetcher instance; nothing is shared across
//! instances or globally. Expiry is lazy: a stale entry is dropped when
//! the next lookup touches it, there is no background sweep.

use jiff::Timestamp;
use std::collections::HashMap;
use std::time::Duration;

use crate::time::TimeSource;

struct CacheEntry<T> {
    value: T,
    stored_at: Timestamp,
}

pub(crate) struct ResponseCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    time_source: TimeSource,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(time_source: TimeSource) -> Self {
        Self {
            entries: HashMap::new(),
            time_source,
        }
    }

    /// A value younger than `ttl` for `key`, or `None`. An entry at or
    /// past its TTL is treated as absent and evicted here.
    pub fn lookup(&mut self, key: &str, ttl: Duration) -> Option<T> {
        let entry = self.entries.get(key)?;
        let age = self.time_source.now().duration_since(entry.stored_at);
        if age.as_millis() < ttl.as_millis() as i128 {
            tracing::debug!(key, "cache hit");
            return Some(entry.value.clone());
        }
        tracing::debug!(key, "evicting stale cache entry");
        self.entries.remove(key);
        None
    }

    /// Last write wins; a successful call always overwrites its key.
    pub fn store(&mut self, key: String, value: T) {
        tracing::debug!(key, "caching response");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: self.time_source.now(),
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
