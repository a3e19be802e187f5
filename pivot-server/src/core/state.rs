use pivot_engine::{AggregationPort, MemoryLedger};
use shared::error::AppResult;
use std::sync::Arc;
use std::time::Instant;

use crate::core::Config;

/// Shared handles for every request
///
/// Cloning is cheap: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    port: Arc<dyn AggregationPort>,
    started_at: Instant,
}

impl ServerState {
    /// Build the state over the in-memory ledger named by the config
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let ledger = match &config.ledger_path {
            Some(path) => MemoryLedger::from_json_file(path)?,
            None => {
                tracing::warn!("PIVOT_LEDGER_PATH not set, starting with an empty ledger");
                MemoryLedger::default()
            }
        };
        Ok(Self::with_port(config.clone(), Arc::new(ledger)))
    }

    /// Serve an arbitrary aggregation source
    pub fn with_port(config: Config, port: Arc<dyn AggregationPort>) -> Self {
        Self {
            config,
            port,
            started_at: Instant::now(),
        }
    }

    pub fn port(&self) -> &dyn AggregationPort {
        self.port.as_ref()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
