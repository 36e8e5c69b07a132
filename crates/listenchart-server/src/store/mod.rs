//! Key-value store access.
//!
//! The chart only ever reads one text blob per day, keyed `YYYY-MM-DD`. The
//! handle is built once at startup and injected through `AppState`.

mod memory;
mod redis_store;

use async_trait::async_trait;

use listenchart_core::error::Result;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

/// Read-only view of the store.
///
/// `Ok(None)` means the key does not exist. Connection-level failures should
/// surface as `ListenChartError::StoreUnavailable`, everything else as
/// `ListenChartError::Store`.
#[async_trait]
pub trait ListenerStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
}
