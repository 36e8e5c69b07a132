//! Redis-backed store.
//!
//! One multiplexed connection is opened lazily and shared by all requests.
//! It is dropped after a connection-level error so the next lookup
//! reconnects; a Redis outage therefore fails requests, not the process.
//! Connects and replies are bounded by the configured timeouts.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::Mutex;

use listenchart_core::error::{ListenChartError, Result};

use super::ListenerStore;
use crate::config::StoreSection;

pub struct RedisStore {
    client: Client,
    connect_timeout: Duration,
    response_timeout: Duration,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisStore {
    /// Validate the address. No connection is made until the first lookup.
    pub fn open(cfg: &StoreSection) -> Result<Self> {
        let url = cfg.redis_url();
        let client = Client::open(url.as_str()).map_err(|e| {
            ListenChartError::BadConfig(format!("invalid store address {url}: {e}"))
        })?;
        Ok(Self {
            client,
            connect_timeout: Duration::from_millis(cfg.connect_timeout_ms),
            response_timeout: Duration::from_millis(cfg.response_timeout_ms),
            conn: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection_with_timeouts(
                self.response_timeout,
                self.connect_timeout,
            )
            .await
            .map_err(|e| ListenChartError::StoreUnavailable(e.to_string()))?;
        tracing::info!("store connection established");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    async fn reset(&self) {
        *self.conn.lock().await = None;
    }

    #[cfg(test)]
    async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

fn is_connection_error(e: &RedisError) -> bool {
    e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
}

#[async_trait]
impl ListenerStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(v) => Ok(v),
            Err(e) if is_connection_error(&e) => {
                tracing::warn!(error = %e, "store connection lost");
                self.reset().await;
                Err(ListenChartError::StoreUnavailable(e.to_string()))
            }
            Err(e) => Err(ListenChartError::Store(format!("GET {key}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn section(addr: &str) -> StoreSection {
        StoreSection {
            addr: addr.into(),
            ..StoreSection::default()
        }
    }

    #[test]
    fn open_rejects_bad_address() {
        let err = RedisStore::open(&section("127.0.0.1:notaport")).err();
        assert_eq!(err.map(|e| e.code().as_str()), Some("BAD_CONFIG"));
    }

    #[test]
    fn open_does_not_connect() {
        // Nothing listens on port 1; open must still succeed.
        assert!(RedisStore::open(&section("127.0.0.1:1")).is_ok());
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let store = match RedisStore::open(&section("127.0.0.1:1")) {
            Ok(s) => s,
            Err(e) => panic!("open failed: {e}"),
        };

        let err = store.get("2024-03-27").await.err();
        assert_eq!(err.as_ref().map(|e| e.code().as_str()), Some("STORE_UNAVAILABLE"));
        assert!(!store.is_connected().await);

        // Next lookup tries again rather than caching the failure forever.
        let err = store.get("2024-03-28").await.err();
        assert!(err.is_some_and(|e| e.is_unavailable()));
    }

    #[test]
    fn connection_errors_versus_reply_errors() {
        let refused = RedisError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(is_connection_error(&refused));

        let reset = RedisError::from(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(is_connection_error(&reset));

        let wrong_type = RedisError::from((redis::ErrorKind::TypeError, "WRONGTYPE"));
        assert!(!is_connection_error(&wrong_type));
    }
}
