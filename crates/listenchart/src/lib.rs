//! Top-level facade crate for listenchart.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use listenchart_core::*;
}

pub mod server {
    pub use listenchart_server::*;
}
