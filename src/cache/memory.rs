//! In-process cache backend built on moka.
//!
//! TTL varies per entry (the service picks it by data kind), so expiration
//! goes through an [`Expiry`] policy reading the TTL stored on each entry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use tracing::debug;

use crate::cache::Cache;

const MAX_CAPACITY: u64 = 100_000;

#[derive(Clone)]
struct CacheEntry {
    value: String,
    ttl_secs: u64,
}

struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(entry.ttl_secs))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // overwrites restart the clock with the new entry's TTL
        Some(Duration::from_secs(entry.ttl_secs))
    }
}

pub struct MemoryCache {
    inner: moka::future::Cache<String, CacheEntry>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            inner: moka::future::Cache::builder()
                .max_capacity(MAX_CAPACITY)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Some(entry) => {
                debug!("Cache hit for key: {}", key);
                Some(entry.value)
            }
            None => {
                debug!("Cache miss for key: {}", key);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        self.inner
            .insert(
                key.to_string(),
                CacheEntry {
                    value: value.to_string(),
                    ttl_secs,
                },
            )
            .await;
    }

    async fn del(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
