//! Pivot API handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pivot_engine::AggregationPort;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    DailyPoint, DailySeriesRequest, ExportFile, ExportQuery, PivotPage, PivotQuery, SummaryQuery,
    SummaryRow,
};

use crate::core::ServerState;
use crate::utils::payload;

/// POST /api/pivot/summary
pub async fn summary(
    State(state): State<ServerState>,
    body: Result<Json<SummaryQuery>, JsonRejection>,
) -> AppResult<ApiResponse<Vec<SummaryRow>>> {
    let query = payload(body)?;
    let rows = state.port().fetch_summary(&query).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/pivot/drill
pub async fn drill(
    State(state): State<ServerState>,
    body: Result<Json<PivotQuery>, JsonRejection>,
) -> AppResult<ApiResponse<PivotPage>> {
    let query = payload(body)?;
    query.validate()?;
    let page = state.port().fetch_pivot(&query).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/pivot/daily
pub async fn daily(
    State(state): State<ServerState>,
    body: Result<Json<DailySeriesRequest>, JsonRejection>,
) -> AppResult<ApiResponse<Vec<DailyPoint>>> {
    let request = payload(body)?;
    let series = state
        .port()
        .fetch_daily_series(&request.period, &request.entity)
        .await?;
    Ok(ApiResponse::success(series))
}

/// POST /api/pivot/export
///
/// CSV bytes (BOM included) travel base64-encoded.
pub async fn export(
    State(state): State<ServerState>,
    body: Result<Json<ExportQuery>, JsonRejection>,
) -> AppResult<ApiResponse<Vec<ExportFile>>> {
    let query = payload(body)?;
    let documents = state.port().export_mode_cube(&query).await?;
    let files = documents
        .into_iter()
        .map(|doc| ExportFile {
            content_base64: STANDARD.encode(&doc.bytes),
            file_name: doc.file_name,
        })
        .collect();
    Ok(ApiResponse::success(files))
}
