use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::base62;
use crate::config::Config;
use crate::errors::{Result, UrlShortError};

pub mod memory;
pub mod redis;

/// One short id minted for a long URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIdEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// One canonicalized long URL with every short id ever minted for it.
///
/// `short_ids` is append-only and ordered by creation; ids are unique across
/// the whole system, not just within one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub long_url: String,
    pub short_ids: Vec<ShortIdEntry>,
    pub created_at: DateTime<Utc>,
}

/// One redirect event. Append-only; read back only through aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub short_id: String,
    pub access_time: DateTime<Utc>,
}

/// Attempts at minting a globally unique short id before giving up.
///
/// The checksum encoding is lossy, so two random tokens can land on the
/// same id; the backend's uniqueness claim fails in that case and the mint
/// is retried with a fresh token.
pub const MAX_MINT_ATTEMPTS: usize = 5;

/// Mints a candidate short id from a fresh random token.
pub(crate) fn mint_short_id() -> String {
    base62::encode(&Uuid::new_v4().to_string())
}

/// Persistent long URL <-> short id mapping. Owns id uniqueness.
#[async_trait]
pub trait UrlRepository: Send + Sync + std::fmt::Debug {
    /// Looks up the record for a long URL. `None` means no record, which is
    /// never conflated with a storage fault.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>>;

    /// Looks up the record containing a short id. The id is matched as an
    /// opaque string against the stored ids, never interpolated into a
    /// query expression.
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>>;

    /// Mints a new short id for `long_url` and persists it, creating the
    /// record on first sight or appending to the existing one. Every call
    /// produces a new id, including for long URLs seen before.
    ///
    /// The upsert+append must be atomic at the storage layer: two
    /// concurrent calls for the same long URL may not lose an id.
    async fn create_or_append(&self, long_url: &str) -> Result<String>;

    async fn backend_name(&self) -> String;
}

/// Append-only record of redirect accesses, queryable by time range.
#[async_trait]
pub trait AccessLogStore: Send + Sync + std::fmt::Debug {
    /// Appends one access event stamped with the current time.
    async fn record(&self, short_id: &str) -> Result<()>;

    /// Counts events for `short_id` with access time >= `start`. Returns 0
    /// when nothing matches.
    async fn count_since(&self, short_id: &str, start: DateTime<Utc>) -> Result<u64>;
}

pub struct StorageFactory;

impl StorageFactory {
    /// Builds the repository and access-log backends selected by
    /// `STORAGE_BACKEND`. Clients are constructed here and injected; no
    /// process-global connection state.
    pub fn create(config: &Config) -> Result<(Arc<dyn UrlRepository>, Arc<dyn AccessLogStore>)> {
        match config.storage_backend.as_str() {
            "memory" => Ok((
                Arc::new(memory::MemoryRepository::new()),
                Arc::new(memory::MemoryAccessLog::new()),
            )),
            "redis" => {
                let repository = redis::RedisRepository::new(config)?;
                let access_log = redis::RedisAccessLog::new(config)?;
                Ok((Arc::new(repository), Arc::new(access_log)))
            }
            other => Err(UrlShortError::configuration(format!(
                "Unknown storage backend '{other}'. Valid: memory, redis"
            ))),
        }
    }
}
