//! Error types for mktwire-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid feed kind: {0}")]
    InvalidFeedKind(String),

    #[error("Invalid capture stamp: {0}")]
    InvalidStamp(String),

    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
