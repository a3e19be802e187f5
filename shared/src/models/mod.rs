//! Domain models
//!
//! Shared between the engine, the HTTP service and the remote client.
//! Wire field names are camelCase except where the reporting frontend
//! expects snake_case (`unit_price`, `next_cursor`).

pub mod axis;
pub mod export;
pub mod master;
pub mod metric;
pub mod period;
pub mod query;

// Re-exports
pub use axis::*;
pub use export::*;
pub use master::*;
pub use metric::*;
pub use period::*;
pub use query::*;
