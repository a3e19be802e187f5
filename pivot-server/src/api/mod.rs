//! HTTP routes
//!
//! - [`health`] - liveness
//! - [`pivot`] - summary, drill-down, daily series and export
//! - [`master`] - sales reps, customers and items

pub mod health;
pub mod master;
pub mod pivot;

use axum::Router;
use axum::middleware::{self, Next};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Access log line per request
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// All routes, no state or middleware
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(pivot::router())
        .merge(master::router())
}

/// The fully layered application, used by the listener and by in-process tests
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
