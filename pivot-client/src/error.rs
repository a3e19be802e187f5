//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not a response envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered with an error envelope
    #[error("{0}")]
    Api(AppError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(e) => e,
            ClientError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            ClientError::Http(e) => AppError::network(e.to_string()),
            ClientError::InvalidResponse(msg) => AppError::upstream(msg),
            ClientError::Serialization(e) => {
                AppError::with_message(ErrorCode::SerializationError, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_passes_through() {
        let original = AppError::invalid_cursor("abc");
        let mapped: AppError = ClientError::Api(original.clone()).into();
        assert_eq!(mapped, original);
    }

    #[test]
    fn test_invalid_response_is_upstream_failure() {
        let mapped: AppError = ClientError::InvalidResponse("html page".into()).into();
        assert_eq!(mapped.code, ErrorCode::UpstreamError);
        assert!(mapped.is_port_failure());
    }
}
