//! Business logic for the three use cases: shorten, redirect, analytics.
//!
//! Each request is a short-lived, stateless invocation over the injected
//! repository, access log and cache; there is no in-process mutable state
//! outside those collaborators.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::base62;
use crate::cache::{self, Cache};
use crate::config::TtlPolicy;
use crate::errors::{Result, UrlShortError};
use crate::storages::{AccessLogStore, UrlRepository};

/// Analytics query window.
///
/// Unrecognized values are not an error: they count like [`TimeFrame::All`]
/// but keep their own cache partition, and responses echo the original
/// request value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFrame {
    Last24h,
    Last7d,
    All,
    Other(String),
}

impl TimeFrame {
    /// Parses the request's time-frame parameter. Omitted or empty values
    /// mean "all".
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("all") => TimeFrame::All,
            Some("24h") => TimeFrame::Last24h,
            Some("7d") => TimeFrame::Last7d,
            Some(other) => TimeFrame::Other(other.to_string()),
        }
    }

    /// The value echoed back to the client and used as the cache partition.
    pub fn as_request_value(&self) -> &str {
        match self {
            TimeFrame::Last24h => "24h",
            TimeFrame::Last7d => "7d",
            TimeFrame::All => "all",
            TimeFrame::Other(raw) => raw,
        }
    }

    /// Start of the counting window. Anything but `24h`/`7d` counts since
    /// the epoch.
    pub fn start_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeFrame::Last24h => now - Duration::days(1),
            TimeFrame::Last7d => now - Duration::days(7),
            TimeFrame::All | TimeFrame::Other(_) => DateTime::UNIX_EPOCH,
        }
    }

    /// Cache TTL for a report over this window.
    pub fn cache_ttl(&self, ttl: &TtlPolicy) -> u64 {
        match self {
            TimeFrame::Last24h => ttl.analytics_24h_secs,
            TimeFrame::Last7d => ttl.analytics_7d_secs,
            TimeFrame::All => ttl.analytics_all_secs,
            TimeFrame::Other(_) => ttl.analytics_other_secs,
        }
    }
}

/// Access-count report for one short id over one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub time_frame: String,
    pub access_count: u64,
}

pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    access_log: Arc<dyn AccessLogStore>,
    cache: Arc<dyn Cache>,
    ttl: TtlPolicy,
}

impl UrlService {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        access_log: Arc<dyn AccessLogStore>,
        cache: Arc<dyn Cache>,
        ttl: TtlPolicy,
    ) -> Self {
        Self {
            repository,
            access_log,
            cache,
            ttl,
        }
    }

    /// Mints a new short id for `long_url`. Every call produces a new id,
    /// including for long URLs seen before.
    pub async fn shorten(&self, long_url: &str) -> Result<String> {
        if long_url.is_empty() {
            return Err(UrlShortError::validation("longUrl must not be empty"));
        }

        let id = self.repository.create_or_append(long_url).await?;
        if id.is_empty() {
            // a nominally successful mint may never yield an empty id
            return Err(UrlShortError::storage_operation(
                "Repository returned an empty short id",
            ));
        }
        Ok(id)
    }

    /// Resolves a short id to its long URL, recording the access.
    ///
    /// The access is recorded on every attempt, cache hit or miss, found or
    /// not; a failing lookup never takes the log entry with it. The two
    /// operations run concurrently.
    pub async fn redirect(&self, short_id: &str) -> Result<String> {
        if !base62::is_valid_short_id(short_id) {
            return Err(UrlShortError::validation(format!(
                "Malformed short id '{short_id}'"
            )));
        }

        let (recorded, resolved) = tokio::join!(
            self.access_log.record(short_id),
            self.resolve_target(short_id)
        );

        if let Err(e) = recorded {
            // analytics loss must not break redirection
            warn!("Failed to record access for '{}': {}", short_id, e);
        }

        resolved
    }

    /// Read-through lookup of the redirect target.
    async fn resolve_target(&self, short_id: &str) -> Result<String> {
        let key = cache::short_url_key(short_id);
        if let Some(target) = self.cache.get(&key).await {
            return Ok(target);
        }

        match self.repository.find_by_short_id(short_id).await? {
            Some(record) => {
                self.cache
                    .set(&key, &record.long_url, self.ttl.redirect_secs)
                    .await;
                Ok(record.long_url)
            }
            None => Err(UrlShortError::not_found(format!(
                "Short id '{short_id}' not found"
            ))),
        }
    }

    /// Access-count report for a short id over the requested window,
    /// read-through cached with a TTL picked by window volatility.
    pub async fn analytics(
        &self,
        short_id: &str,
        time_frame: Option<&str>,
    ) -> Result<AnalyticsReport> {
        if !base62::is_valid_short_id(short_id) {
            return Err(UrlShortError::validation(format!(
                "Malformed short id '{short_id}'"
            )));
        }

        let frame = TimeFrame::parse(time_frame);
        let key = cache::analytics_key(short_id, frame.as_request_value());

        if let Some(raw) = self.cache.get(&key).await {
            match serde_json::from_str::<AnalyticsReport>(&raw) {
                Ok(report) => return Ok(report),
                Err(e) => {
                    debug!("Discarding undecodable cached report for '{}': {}", key, e);
                }
            }
        }

        // existence check is independent of the cache
        if self.repository.find_by_short_id(short_id).await?.is_none() {
            return Err(UrlShortError::not_found(format!(
                "Short id '{short_id}' not found"
            )));
        }

        let start = frame.start_date(Utc::now());
        let access_count = self.access_log.count_since(short_id, start).await?;

        let report = AnalyticsReport {
            time_frame: frame.as_request_value().to_string(),
            access_count,
        };

        match serde_json::to_string(&report) {
            Ok(raw) => self.cache.set(&key, &raw, frame.cache_ttl(&self.ttl)).await,
            Err(e) => warn!("Failed to serialize report for '{}': {}", key, e),
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_frame_parsing() {
        assert_eq!(TimeFrame::parse(None), TimeFrame::All);
        assert_eq!(TimeFrame::parse(Some("")), TimeFrame::All);
        assert_eq!(TimeFrame::parse(Some("all")), TimeFrame::All);
        assert_eq!(TimeFrame::parse(Some("24h")), TimeFrame::Last24h);
        assert_eq!(TimeFrame::parse(Some("7d")), TimeFrame::Last7d);
        assert_eq!(
            TimeFrame::parse(Some("fortnight")),
            TimeFrame::Other("fortnight".to_string())
        );
        // case-sensitive on purpose: "24H" is its own partition
        assert_eq!(
            TimeFrame::parse(Some("24H")),
            TimeFrame::Other("24H".to_string())
        );
    }

    #[test]
    fn start_dates_per_window() {
        let now = Utc::now();
        assert_eq!(TimeFrame::Last24h.start_date(now), now - Duration::days(1));
        assert_eq!(TimeFrame::Last7d.start_date(now), now - Duration::days(7));
        assert_eq!(TimeFrame::All.start_date(now), DateTime::UNIX_EPOCH);
        // unrecognized windows count since the epoch, like "all"
        assert_eq!(
            TimeFrame::Other("x".to_string()).start_date(now),
            DateTime::UNIX_EPOCH
        );
    }

    #[test]
    fn cache_ttl_selection_follows_table() {
        let ttl = TtlPolicy::default();
        assert_eq!(TimeFrame::Last24h.cache_ttl(&ttl), 1_800);
        assert_eq!(TimeFrame::Last7d.cache_ttl(&ttl), 21_600);
        assert_eq!(TimeFrame::All.cache_ttl(&ttl), 86_400);
        assert_eq!(TimeFrame::Other("x".to_string()).cache_ttl(&ttl), 3_600);
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = AnalyticsReport {
            time_frame: "24h".to_string(),
            access_count: 5,
        };
        let raw = serde_json::to_string(&report).unwrap();
        assert_eq!(raw, r#"{"timeFrame":"24h","accessCount":5}"#);
    }
}
