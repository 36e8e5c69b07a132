//! In-process metrics rendered by `GET /metrics`.

pub mod metrics;

pub use metrics::ServerMetrics;
