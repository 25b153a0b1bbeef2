//! Errors talking to the remote service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid stack reference '{reference}': {message}")]
    InvalidStackReference { reference: String, message: String },

    #[error("could not determine cloud console URL")]
    ConsoleUrlUnavailable,
}

pub type CloudResult<T> = std::result::Result<T, CloudError>;

impl From<CloudError> for stackline_core::Error {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::Api {
                status: 401 | 403,
                message,
            } => stackline_core::Error::Unauthorized(message),
            CloudError::Api {
                status: 404,
                message,
            } => stackline_core::Error::NotFound(message),
            CloudError::Api {
                status: 409,
                message,
            } => stackline_core::Error::Conflict(message),
            CloudError::InvalidStackReference { .. } => {
                stackline_core::Error::InvalidInput(err.to_string())
            }
            CloudError::ConsoleUrlUnavailable => stackline_core::Error::ConsoleUrlUnavailable,
            _ => stackline_core::Error::Service(err.to_string()),
        }
    }
}
