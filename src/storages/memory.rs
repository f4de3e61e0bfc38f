//! In-memory storage backends.
//!
//! Default for development and tests. The repository keeps records in a
//! `DashMap` keyed by long URL plus a short-id index; appends go through the
//! map's entry API so concurrent shortens for the same long URL cannot lose
//! an id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;

use crate::errors::{Result, UrlShortError};
use crate::storages::{
    AccessLogEntry, AccessLogStore, MAX_MINT_ATTEMPTS, ShortIdEntry, UrlRecord, UrlRepository,
    mint_short_id,
};

#[derive(Debug, Default)]
pub struct MemoryRepository {
    /// long URL -> record
    records: DashMap<String, UrlRecord>,
    /// short id -> long URL; insertion here is the global uniqueness claim
    short_index: DashMap<String, String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for MemoryRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        Ok(self.records.get(long_url).map(|r| r.value().clone()))
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>> {
        let long_url = match self.short_index.get(short_id) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };
        Ok(self.records.get(&long_url).map(|r| r.value().clone()))
    }

    async fn create_or_append(&self, long_url: &str) -> Result<String> {
        for _ in 0..MAX_MINT_ATTEMPTS {
            let id = mint_short_id();

            // claim the id first; an occupied slot means the lossy encoding
            // collided and we mint again with a fresh token
            match self.short_index.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(long_url.to_string());
                }
            }

            let entry = ShortIdEntry {
                id: id.clone(),
                created_at: Utc::now(),
            };
            let first = entry.clone();
            self.records
                .entry(long_url.to_string())
                .and_modify(|record| record.short_ids.push(entry))
                .or_insert_with(|| UrlRecord {
                    long_url: long_url.to_string(),
                    created_at: first.created_at,
                    short_ids: vec![first],
                });

            return Ok(id);
        }

        Err(UrlShortError::storage_operation(format!(
            "Could not mint a unique short id after {MAX_MINT_ATTEMPTS} attempts"
        )))
    }

    async fn backend_name(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Default)]
pub struct MemoryAccessLog {
    entries: RwLock<Vec<AccessLogEntry>>,
}

impl MemoryAccessLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessLogStore for MemoryAccessLog {
    async fn record(&self, short_id: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(AccessLogEntry {
            short_id: short_id.to_string(),
            access_time: Utc::now(),
        });
        Ok(())
    }

    async fn count_since(&self, short_id: &str, start: DateTime<Utc>) -> Result<u64> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.short_id == short_id && e.access_time >= start)
            .count() as u64)
    }
}
