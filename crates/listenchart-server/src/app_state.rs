//! Shared application state.
//!
//! Holds the config, the store handle, the clock and metrics for the
//! lifetime of the server. Cloned into every handler by axum.

use std::sync::Arc;

use listenchart_core::error::Result;
use listenchart_core::range::{Clock, SystemClock};

use crate::config::ListenChartConfig;
use crate::obs::ServerMetrics;
use crate::store::{ListenerStore, RedisStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ListenChartConfig,
    store: Arc<dyn ListenerStore>,
    clock: Arc<dyn Clock>,
    metrics: ServerMetrics,
}

impl AppState {
    pub fn new(
        cfg: ListenChartConfig,
        store: Arc<dyn ListenerStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                clock,
                metrics: ServerMetrics::default(),
            }),
        }
    }

    /// Production wiring: Redis store and the wall clock.
    /// The store connects lazily, so an unreachable Redis does not fail boot.
    pub fn connect(cfg: ListenChartConfig) -> Result<Self> {
        let store = RedisStore::open(&cfg.store)?;
        tracing::info!(addr = %cfg.store.addr, db = cfg.store.db, "store configured");
        Ok(Self::new(cfg, Arc::new(store), Arc::new(SystemClock)))
    }

    pub fn cfg(&self) -> &ListenChartConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &dyn ListenerStore {
        self.inner.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.inner.metrics
    }
}
