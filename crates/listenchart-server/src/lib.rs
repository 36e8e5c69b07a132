//! listenchart server library entry.
//!
//! Wires config, the store handle, the chart pipeline and the HTTP routes.
//! Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod chart;
pub mod config;
pub mod http;
pub mod obs;
pub mod router;
pub mod store;
