//! Session error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    #[error("Service open failed: name={name}, reason={reason}")]
    ServiceFailed { name: String, reason: String },

    #[error("Subscribe failed: {0}")]
    SubscribeFailed(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
