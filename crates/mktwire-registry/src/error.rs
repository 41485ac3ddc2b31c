//! Registry error types.

use mktwire_core::CorrelationToken;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate correlation token: {0}")]
    DuplicateToken(CorrelationToken),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
