//! Gateway error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(#[from] mktwire_session::SessionError),

    #[error("Registry error: {0}")]
    Registry(#[from] mktwire_registry::RegistryError),

    #[error("Feed error: {0}")]
    Feed(#[from] mktwire_feed::FeedError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] mktwire_persistence::PersistenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
