//! Pivot API
//!
//! | path | method | body | data |
//! |------|--------|------|------|
//! | /api/pivot/summary | POST | `SummaryQuery` | `SummaryRow[]` |
//! | /api/pivot/drill | POST | `PivotQuery` | `PivotPage` |
//! | /api/pivot/daily | POST | `DailySeriesRequest` | `DailyPoint[]` |
//! | /api/pivot/export | POST | `ExportQuery` | `ExportFile[]` |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pivot", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/summary", post(handler::summary))
        .route("/drill", post(handler::drill))
        .route("/daily", post(handler::daily))
        .route("/export", post(handler::export))
}
