//! listenchart core: date ranges, blob extraction, and the chart payload.
//!
//! This crate owns the only logic worth testing in isolation: which dates a
//! chart covers, how a listener count is pulled out of a stored blob, and how
//! the per-day records become a chart-ready payload. It carries no HTTP or
//! store dependencies so the server and tests can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed blobs degrade to "no data" instead of failing a request.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod extract;
pub mod range;
pub mod series;

/// Shared result type.
pub use error::{ListenChartError, Result};
