//! HTTP handlers.
//!
//! - `/`           : static front end
//! - `/chart-data` : chart payload JSON
//! - `/healthz`    : liveness
//! - `/metrics`    : Prometheus text format

pub mod chart;
pub mod index;
pub mod ops;
