//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::LoadInFlight | Self::StaleResponse => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::DrawerClosed
            | Self::LoadMoreUnavailable
            | Self::ExportFailed
            | Self::NoRepresentatives => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::InvalidPeriod
            | Self::PeriodConflict
            | Self::PeriodMissing
            | Self::TargetAxisIsBase
            | Self::InvalidTopN
            | Self::InvalidCursor
            | Self::InvalidSortKey
            | Self::InvalidRecord => StatusCode::BAD_REQUEST,

            // 502 / 504 upstream
            Self::NetworkError | Self::UpstreamError => StatusCode::BAD_GATEWAY,
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::ConfigError
            | Self::SerializationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
