//! Pivot analytics HTTP service
//!
//! Serves any [`AggregationPort`](pivot_engine::AggregationPort) over JSON.
//! The binary wires it to a [`MemoryLedger`](pivot_engine::MemoryLedger)
//! seeded from `PIVOT_LEDGER_PATH`.
//!
//! ```text
//! pivot-server/src/
//! ├── core/    # config, state, listener
//! ├── api/     # routes and handlers
//! └── utils/   # logging, body extraction
//! ```

pub mod api;
pub mod core;
pub mod utils;

pub use api::build_app;
pub use self::core::{Config, Server, ServerState};
pub use utils::logger::init_logger_with_file;
