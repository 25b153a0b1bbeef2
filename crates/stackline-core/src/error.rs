//! Error types for Stackline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("snapshot integrity: {0}")]
    Integrity(String),

    #[error("could not determine cloud console URL")]
    ConsoleUrlUnavailable,

    #[error("service request failed: {0}")]
    Service(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
