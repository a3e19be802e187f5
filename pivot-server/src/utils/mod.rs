//! Utilities
//!
//! - [`logger`] - tracing subscriber setup
//! - [`json`] - JSON body extraction with unified errors

pub mod json;
pub mod logger;

pub use json::payload;
