//! Shared error type across listenchart crates.

use thiserror::Error;

/// Stable error codes, used in logs and plain-text error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration could not be parsed or failed validation.
    BadConfig,
    /// A single store lookup failed.
    Store,
    /// The store could not be reached at all.
    StoreUnavailable,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Store => "STORE",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ListenChartError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum ListenChartError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ListenChartError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ListenChartError::BadConfig(_) => ErrorCode::BadConfig,
            ListenChartError::Store(_) => ErrorCode::Store,
            ListenChartError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            ListenChartError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Connection-level failures, as opposed to a bad reply for one key.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ListenChartError::StoreUnavailable(_))
    }
}
