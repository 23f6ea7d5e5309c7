use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use super::ResponseCache;

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= self.ttl
    }
}

/// Bounded in-process cache with per-entry expiry.
///
/// When over the bound, expired entries are purged first, then the oldest
/// live entries are evicted until it fits again.
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
}

impl MemoryCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Brings the map back within `max_entries` after an insert. Runs after
    /// the insert so that concurrent writers cannot leave it over the bound.
    fn enforce_bound(&self, incoming: &str) {
        if self.entries.len() <= self.max_entries {
            return;
        }

        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .filter(|entry| entry.key() != incoming)
                .min_by_key(|entry| entry.inserted_at)
                .map(|entry| entry.key().clone());

            let Some(key) = oldest else { break };
            debug!(key = %key, "Evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(crate::constants::cache::DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }

        // A concurrent writer may have replaced the entry since the read
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> anyhow::Result<()> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
        self.enforce_bound(key);
        Ok(())
    }

    async fn forget(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}
