//! Remote aggregation port
//!
//! [`HttpAggregationPort`] implements [`pivot_engine::AggregationPort`] over
//! the pivot server's JSON API, so a
//! [`DrillDownSession`](pivot_engine::DrillDownSession) can run against a
//! remote data source unchanged.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpAggregationPort, HttpClient};
