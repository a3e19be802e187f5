//! Master data API
//!
//! | path | method | data |
//! |------|--------|------|
//! | /api/master/reps | GET | `MasterRecord[]` |
//! | /api/master/customers | GET | `MasterRecord[]` |
//! | /api/master/items | GET | `MasterRecord[]` |

use axum::{Router, extract::State, routing::get};
use pivot_engine::AggregationPort;
use shared::error::{ApiResponse, AppResult};
use shared::models::MasterRecord;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/master", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/reps", get(reps))
        .route("/customers", get(customers))
        .route("/items", get(items))
}

/// GET /api/master/reps
pub async fn reps(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<MasterRecord>>> {
    Ok(ApiResponse::success(state.port().list_sales_reps().await?))
}

/// GET /api/master/customers
pub async fn customers(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<MasterRecord>>> {
    Ok(ApiResponse::success(state.port().list_customers().await?))
}

/// GET /api/master/items
pub async fn items(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<MasterRecord>>> {
    Ok(ApiResponse::success(state.port().list_items().await?))
}
