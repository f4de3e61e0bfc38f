//! Urlshort - a URL shortening service with access analytics
//!
//! This library provides the core functionality for the urlshort service:
//! short-id generation, persistent URL/access-log storage behind pluggable
//! backends, a read-through cache and the HTTP API on top of them.
//!
//! # Architecture
//! - `base62`: checksum-style short-id encoding
//! - `storages`: URL repository and access-log backends
//! - `cache`: read-through cache with per-data-kind TTLs
//! - `services`: business logic orchestration
//! - `api`: HTTP handlers and route registration
//! - `config`: environment-based configuration
//! - `errors`: crate-wide error taxonomy

pub mod api;
pub mod base62;
pub mod cache;
pub mod config;
pub mod errors;
pub mod redis_conn;
pub mod services;
pub mod storages;
pub mod utils;
