//! Server configuration, state and runner
//!
//! - [`Config`] - environment-driven settings
//! - [`ServerState`] - shared request state
//! - [`Server`] - HTTP listener lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
