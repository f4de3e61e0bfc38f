use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::{Result, UrlShortError};

pub mod memory;
pub mod redis;

/// Key for a cached redirect target.
pub fn short_url_key(short_id: &str) -> String {
    format!("shortUrl:{short_id}")
}

/// Key for a cached analytics report. `partition` is the request's original
/// time-frame value, so unrecognized values get their own cache partition
/// instead of being folded into "all".
pub fn analytics_key(short_id: &str, partition: &str) -> String {
    format!("analytics:{short_id}:{partition}")
}

/// Key-value cache with a per-entry TTL.
///
/// Caching is an optimization, not a correctness requirement: backends log
/// faults and degrade to a miss (`get`) or a no-op (`set`/`del`), so a cache
/// problem never fails a request.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str, ttl_secs: u64);
    /// Invalidation escape hatch; not used by the default request flows.
    async fn del(&self, key: &str);
}

pub struct CacheFactory;

impl CacheFactory {
    pub fn create(config: &Config) -> Result<Arc<dyn Cache>> {
        match config.cache_backend.as_str() {
            "memory" => Ok(Arc::new(memory::MemoryCache::new())),
            "redis" => Ok(Arc::new(redis::RedisCache::new(config)?)),
            other => Err(UrlShortError::configuration(format!(
                "Unknown cache backend '{other}'. Valid: memory, redis"
            ))),
        }
    }
}
