//! Redis storage backends.
//!
//! Layout (all keys under the configured prefix):
//! - `short:{id}` -> long URL, written with `SET NX` as the global
//!   uniqueness claim for the id
//! - `url:{longUrl}` -> sorted set of short ids scored by creation time
//!   in unix milliseconds
//! - `log:{id}` -> sorted set of access events scored by access time
//!
//! The claim and the append run inside one Lua script, so concurrent
//! shortens for the same long URL cannot lose an appended id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tracing::error;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{Result, UrlShortError};
use crate::redis_conn::RedisConnector;
use crate::storages::{
    AccessLogStore, MAX_MINT_ATTEMPTS, ShortIdEntry, UrlRecord, UrlRepository, mint_short_id,
};

const CLAIM_AND_APPEND: &str = r#"
if redis.call('SET', KEYS[1], ARGV[1], 'NX') == false then
  return 0
end
redis.call('ZADD', KEYS[2], ARGV[2], ARGV[3])
return 1
"#;

#[derive(Debug)]
pub struct RedisRepository {
    connector: RedisConnector,
    key_prefix: String,
    claim_and_append: redis::Script,
}

impl RedisRepository {
    pub fn new(config: &Config) -> Result<Self> {
        let connector = RedisConnector::open(&config.redis_url)
            .map_err(|e| UrlShortError::configuration(format!("Invalid Redis URL: {e}")))?;
        Ok(Self {
            connector,
            key_prefix: config.redis_key_prefix.clone(),
            claim_and_append: redis::Script::new(CLAIM_AND_APPEND),
        })
    }

    fn short_key(&self, id: &str) -> String {
        format!("{}short:{}", self.key_prefix, id)
    }

    fn url_key(&self, long_url: &str) -> String {
        format!("{}url:{}", self.key_prefix, long_url)
    }

    async fn storage_error(&self, op: &str, err: redis::RedisError) -> UrlShortError {
        error!("Redis {} failed: {}", op, err);
        self.connector.reset().await;
        UrlShortError::storage_operation(format!("Redis {op} failed: {err}"))
    }

    async fn load_record(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => return Err(self.storage_error("connect", e).await),
        };

        let members: Vec<(String, f64)> = match conn
            .zrange_withscores(self.url_key(long_url), 0, -1)
            .await
        {
            Ok(m) => m,
            Err(e) => return Err(self.storage_error("ZRANGE", e).await),
        };

        if members.is_empty() {
            return Ok(None);
        }

        let short_ids: Vec<ShortIdEntry> = members
            .iter()
            .map(|(id, score)| ShortIdEntry {
                id: id.clone(),
                created_at: millis_to_datetime(*score as i64),
            })
            .collect();
        let created_at = short_ids[0].created_at;

        Ok(Some(UrlRecord {
            long_url: long_url.to_string(),
            short_ids,
            created_at,
        }))
    }
}

#[async_trait]
impl UrlRepository for RedisRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        self.load_record(long_url).await
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>> {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => return Err(self.storage_error("connect", e).await),
        };

        let long_url: Option<String> = match conn.get(self.short_key(short_id)).await {
            Ok(v) => v,
            Err(e) => return Err(self.storage_error("GET", e).await),
        };

        match long_url {
            Some(long_url) => self.load_record(&long_url).await,
            None => Ok(None),
        }
    }

    async fn create_or_append(&self, long_url: &str) -> Result<String> {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => return Err(self.storage_error("connect", e).await),
        };

        for _ in 0..MAX_MINT_ATTEMPTS {
            let id = mint_short_id();
            let now_ms = Utc::now().timestamp_millis();

            let claimed: i64 = match self
                .claim_and_append
                .key(self.short_key(&id))
                .key(self.url_key(long_url))
                .arg(long_url)
                .arg(now_ms)
                .arg(&id)
                .invoke_async(&mut conn)
                .await
            {
                Ok(v) => v,
                Err(e) => return Err(self.storage_error("claim script", e).await),
            };

            if claimed == 1 {
                return Ok(id);
            }
            // id already taken by another long URL: lossy-encoding
            // collision, mint again with a fresh token
        }

        Err(UrlShortError::storage_operation(format!(
            "Could not mint a unique short id after {MAX_MINT_ATTEMPTS} attempts"
        )))
    }

    async fn backend_name(&self) -> String {
        "redis".to_string()
    }
}

#[derive(Debug)]
pub struct RedisAccessLog {
    connector: RedisConnector,
    key_prefix: String,
}

impl RedisAccessLog {
    pub fn new(config: &Config) -> Result<Self> {
        let connector = RedisConnector::open(&config.redis_url)
            .map_err(|e| UrlShortError::configuration(format!("Invalid Redis URL: {e}")))?;
        Ok(Self {
            connector,
            key_prefix: config.redis_key_prefix.clone(),
        })
    }

    fn log_key(&self, short_id: &str) -> String {
        format!("{}log:{}", self.key_prefix, short_id)
    }

    async fn storage_error(&self, op: &str, err: redis::RedisError) -> UrlShortError {
        error!("Redis {} failed: {}", op, err);
        self.connector.reset().await;
        UrlShortError::storage_operation(format!("Redis {op} failed: {err}"))
    }
}

#[async_trait]
impl AccessLogStore for RedisAccessLog {
    async fn record(&self, short_id: &str) -> Result<()> {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => return Err(self.storage_error("connect", e).await),
        };

        let now_ms = Utc::now().timestamp_millis();
        // member carries a uuid so two events in the same millisecond stay
        // distinct zset entries
        let member = format!("{}:{}", now_ms, Uuid::new_v4());

        match conn
            .zadd::<_, _, _, ()>(self.log_key(short_id), member, now_ms)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.storage_error("ZADD", e).await),
        }
    }

    async fn count_since(&self, short_id: &str, start: DateTime<Utc>) -> Result<u64> {
        let mut conn = match self.connector.get().await {
            Ok(c) => c,
            Err(e) => return Err(self.storage_error("connect", e).await),
        };

        match conn
            .zcount(self.log_key(short_id), start.timestamp_millis(), "+inf")
            .await
        {
            Ok(count) => Ok(count),
            Err(e) => Err(self.storage_error("ZCOUNT", e).await),
        }
    }
}

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
}
