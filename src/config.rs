use std::env;

use tracing::warn;

/// Cache TTLs per data kind, in seconds.
///
/// Longer analytics windows change less per unit time, so they tolerate
/// longer staleness; the redirect target almost never changes once created,
/// hence the longest TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// `shortUrl:*` redirect targets.
    pub redirect_secs: u64,
    /// Analytics with time frame `all` or omitted.
    pub analytics_all_secs: u64,
    /// Analytics with time frame `7d`.
    pub analytics_7d_secs: u64,
    /// Analytics with time frame `24h`.
    pub analytics_24h_secs: u64,
    /// Analytics with an unrecognized time frame value.
    pub analytics_other_secs: u64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            redirect_secs: 604_800, // 1 week
            analytics_all_secs: 86_400,
            analytics_7d_secs: 21_600,
            analytics_24h_secs: 1_800,
            analytics_other_secs: 3_600,
        }
    }
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Base URL prepended to minted ids in shorten responses.
    pub base_url: String,
    /// `memory` or `redis`.
    pub storage_backend: String,
    /// `memory` or `redis`.
    pub cache_backend: String,
    pub redis_url: String,
    pub redis_key_prefix: String,
    pub ttl: TtlPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            base_url: "http://localhost:8080".to_string(),
            storage_backend: "memory".to_string(),
            cache_backend: "memory".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_key_prefix: "urlshort:".to_string(),
            ttl: TtlPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let default_ttl = TtlPolicy::default();

        Config {
            server_host: env_or("SERVER_HOST", &defaults.server_host),
            server_port: parse_or("SERVER_PORT", env::var("SERVER_PORT").ok(), defaults.server_port),
            base_url: env_or("BASE_URL", &defaults.base_url),
            storage_backend: env_or("STORAGE_BACKEND", &defaults.storage_backend),
            cache_backend: env_or("CACHE_BACKEND", &defaults.cache_backend),
            redis_url: env_or("REDIS_URL", &defaults.redis_url),
            redis_key_prefix: env_or("REDIS_KEY_PREFIX", &defaults.redis_key_prefix),
            ttl: TtlPolicy {
                redirect_secs: parse_or(
                    "CACHE_TTL_REDIRECT",
                    env::var("CACHE_TTL_REDIRECT").ok(),
                    default_ttl.redirect_secs,
                ),
                analytics_all_secs: parse_or(
                    "CACHE_TTL_ANALYTICS_ALL",
                    env::var("CACHE_TTL_ANALYTICS_ALL").ok(),
                    default_ttl.analytics_all_secs,
                ),
                analytics_7d_secs: parse_or(
                    "CACHE_TTL_ANALYTICS_7D",
                    env::var("CACHE_TTL_ANALYTICS_7D").ok(),
                    default_ttl.analytics_7d_secs,
                ),
                analytics_24h_secs: parse_or(
                    "CACHE_TTL_ANALYTICS_24H",
                    env::var("CACHE_TTL_ANALYTICS_24H").ok(),
                    default_ttl.analytics_24h_secs,
                ),
                analytics_other_secs: parse_or(
                    "CACHE_TTL_ANALYTICS_OTHER",
                    env::var("CACHE_TTL_ANALYTICS_OTHER").ok(),
                    default_ttl.analytics_other_secs,
                ),
            },
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parses an optional env value, falling back to `default` on bad input
/// instead of refusing to start.
fn parse_or<T: std::str::FromStr + Copy>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}, using default", value, name);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_policy_defaults_match_table() {
        let ttl = TtlPolicy::default();
        assert_eq!(ttl.redirect_secs, 604_800);
        assert_eq!(ttl.analytics_all_secs, 86_400);
        assert_eq!(ttl.analytics_7d_secs, 21_600);
        assert_eq!(ttl.analytics_24h_secs, 1_800);
        assert_eq!(ttl.analytics_other_secs, 3_600);
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("X", Some("not-a-number".into()), 42u64), 42);
        assert_eq!(parse_or("X", None, 42u64), 42);
        assert_eq!(parse_or("X", Some("7".into()), 42u64), 7);
    }
}
