//! Unified error codes for the pivot analytics workspace
//!
//! This module defines all error codes used across the engine, the HTTP
//! service and the remote client. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Query validation errors
//! - 2xxx: Drill-down session errors
//! - 3xxx: Export errors
//! - 9xxx: System / aggregation port errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the reporting frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Query ====================
    /// Period is malformed (bad YYYY-MM, or from > to)
    InvalidPeriod = 1001,
    /// Both `month` and `monthRange` were supplied
    PeriodConflict = 1002,
    /// Neither `month` nor `monthRange` was supplied
    PeriodMissing = 1003,
    /// Pivot target axis equals the base axis
    TargetAxisIsBase = 1004,
    /// Top-N outside of 10 / 20 / 50 / "all"
    InvalidTopN = 1005,
    /// Pagination cursor could not be decoded
    InvalidCursor = 1006,
    /// Unknown sort key
    InvalidSortKey = 1007,
    /// Ledger record failed validation
    InvalidRecord = 1008,

    // ==================== 2xxx: Drill-down ====================
    /// Command requires an open drawer
    DrawerClosed = 2001,
    /// Load more is only valid for top-N "all" with a pending cursor
    LoadMoreUnavailable = 2002,
    /// A fetch for this axis is already in flight
    LoadInFlight = 2003,
    /// Response belongs to a superseded generation
    StaleResponse = 2004,

    // ==================== 3xxx: Export ====================
    /// Export composition failed
    ExportFailed = 3001,
    /// No representatives resolved for export
    NoRepresentatives = 3002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Aggregation source returned an error
    UpstreamError = 9006,
    /// Payload could not be (de)serialized
    SerializationError = 9007,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Query
            ErrorCode::InvalidPeriod => "Invalid reporting period",
            ErrorCode::PeriodConflict => "Only one of month or monthRange may be set",
            ErrorCode::PeriodMissing => "One of month or monthRange must be set",
            ErrorCode::TargetAxisIsBase => "Target axis must differ from the base axis",
            ErrorCode::InvalidTopN => "Top-N must be 10, 20, 50 or \"all\"",
            ErrorCode::InvalidCursor => "Invalid pagination cursor",
            ErrorCode::InvalidSortKey => "Invalid sort key",
            ErrorCode::InvalidRecord => "Invalid ledger record",

            // Drill-down
            ErrorCode::DrawerClosed => "Drill-down drawer is not open",
            ErrorCode::LoadMoreUnavailable => "No further page is available",
            ErrorCode::LoadInFlight => "A page load is already in progress",
            ErrorCode::StaleResponse => "Response belongs to a superseded request",

            // Export
            ErrorCode::ExportFailed => "Export failed",
            ErrorCode::NoRepresentatives => "No sales representatives selected",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::UpstreamError => "Aggregation source error",
            ErrorCode::SerializationError => "Serialization error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Query
            1001 => Ok(ErrorCode::InvalidPeriod),
            1002 => Ok(ErrorCode::PeriodConflict),
            1003 => Ok(ErrorCode::PeriodMissing),
            1004 => Ok(ErrorCode::TargetAxisIsBase),
            1005 => Ok(ErrorCode::InvalidTopN),
            1006 => Ok(ErrorCode::InvalidCursor),
            1007 => Ok(ErrorCode::InvalidSortKey),
            1008 => Ok(ErrorCode::InvalidRecord),

            // Drill-down
            2001 => Ok(ErrorCode::DrawerClosed),
            2002 => Ok(ErrorCode::LoadMoreUnavailable),
            2003 => Ok(ErrorCode::LoadInFlight),
            2004 => Ok(ErrorCode::StaleResponse),

            // Export
            3001 => Ok(ErrorCode::ExportFailed),
            3002 => Ok(ErrorCode::NoRepresentatives),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::UpstreamError),
            9007 => Ok(ErrorCode::SerializationError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidPeriod.code(), 1001);
        assert_eq!(ErrorCode::PeriodConflict.code(), 1002);
        assert_eq!(ErrorCode::TargetAxisIsBase.code(), 1004);
        assert_eq!(ErrorCode::DrawerClosed.code(), 2001);
        assert_eq!(ErrorCode::LoadInFlight.code(), 2003);
        assert_eq!(ErrorCode::ExportFailed.code(), 3001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::NetworkError.code(), 9003);
        assert_eq!(ErrorCode::SerializationError.code(), 9007);
    }

    #[test]
    fn test_try_from_roundtrips_every_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::InvalidPeriod,
            ErrorCode::PeriodConflict,
            ErrorCode::PeriodMissing,
            ErrorCode::TargetAxisIsBase,
            ErrorCode::InvalidTopN,
            ErrorCode::InvalidCursor,
            ErrorCode::InvalidSortKey,
            ErrorCode::InvalidRecord,
            ErrorCode::DrawerClosed,
            ErrorCode::LoadMoreUnavailable,
            ErrorCode::LoadInFlight,
            ErrorCode::StaleResponse,
            ErrorCode::ExportFailed,
            ErrorCode::NoRepresentatives,
            ErrorCode::InternalError,
            ErrorCode::NetworkError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
            ErrorCode::UpstreamError,
            ErrorCode::SerializationError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4001), Err(InvalidErrorCode(4001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::PeriodConflict).unwrap(),
            "1002"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("2003").unwrap();
        assert_eq!(code, ErrorCode::LoadInFlight);

        let result: Result<ErrorCode, _> = serde_json::from_str("4242");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::InvalidCursor), "1006");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::PeriodConflict.message(),
            "Only one of month or monthRange may be set"
        );
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
