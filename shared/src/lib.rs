//! Shared types for the pivot analytics workspace
//!
//! Domain vocabulary (axes, periods, queries, metric rows) and the unified
//! error system used by the engine, the HTTP service and the remote client.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
