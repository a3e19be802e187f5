use axum::Json;
use axum::extract::rejection::JsonRejection;
use shared::error::{AppError, AppResult, ErrorCode};

/// Unwrap a JSON body, turning any rejection into a `ValidationFailed` error
///
/// Covers malformed JSON, wrong content type and payloads that fail to
/// deserialize (including invalid period shapes), so none of them reach the
/// aggregation port.
pub fn payload<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let reason = rejection.body_text();
            tracing::debug!(
                status = %rejection.status(),
                reason = %reason,
                "Request body rejected"
            );
            Err(AppError::with_message(ErrorCode::ValidationFailed, "Invalid request body")
                .with_detail("reason", reason))
        }
    }
}
