//! Redis cache backend.
//!
//! Values are plain strings written with `SET key value EX ttl`. Faults are
//! logged and swallowed here: a broken cache degrades the request to the
//! storage path, it never fails it.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, error};

use crate::cache::Cache;
use crate::config::Config;
use crate::errors::{Result, UrlShortError};
use crate::redis_conn::RedisConnector;

pub struct RedisCache {
    connector: RedisConnector,
    key_prefix: String,
}

impl RedisCache {
    pub fn new(config: &Config) -> Result<Self> {
        let connector = RedisConnector::open(&config.redis_url)
            .map_err(|e| UrlShortError::configuration(format!("Invalid Redis URL: {e}")))?;
        Ok(Self {
            connector,
            key_prefix: config.redis_key_prefix.clone(),
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.connector.reset().await;
                return None;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(key)).await;
        match result {
            Ok(Some(value)) => {
                debug!("Cache hit for key: {}", key);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for key: {}", key);
                None
            }
            Err(e) => {
                error!("Failed to get cache key '{}': {}", key, e);
                self.connector.reset().await;
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.connector.reset().await;
                return;
            }
        };

        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(key), value, ttl_secs)
            .await
        {
            error!("Failed to set cache key '{}': {}", key, e);
            self.connector.reset().await;
        }
    }

    async fn del(&self, key: &str) {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.connector.reset().await;
                return;
            }
        };

        if let Err(e) = conn.del::<_, ()>(self.make_key(key)).await {
            error!("Failed to delete cache key '{}': {}", key, e);
            self.connector.reset().await;
        }
    }
}
