//! Shared Redis connection handling for the cache and storage backends.

use std::sync::Arc;

use redis::aio::MultiplexedConnection;
use tokio::sync::RwLock;
use tracing::debug;

/// Lazily established multiplexed connection, shared through cheap clones.
///
/// The connection is opened on first use and cached; on any Redis error the
/// caller resets it so the next operation reconnects.
#[derive(Debug)]
pub struct RedisConnector {
    client: redis::Client,
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
}

impl RedisConnector {
    pub fn open(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns the cached connection, establishing it if needed.
    pub async fn get(&self) -> redis::RedisResult<MultiplexedConnection> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // double-check: another task may have connected while we waited
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// Drops the cached connection so the next `get` reconnects.
    pub async fn reset(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }
}
