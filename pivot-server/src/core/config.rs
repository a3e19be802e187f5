/// Server configuration
///
/// # Environment variables
///
/// | variable | default | meaning |
/// |----------|---------|---------|
/// | PIVOT_HTTP_PORT | 3100 | HTTP listen port |
/// | PIVOT_LEDGER_PATH | (unset) | JSON seed for the in-memory ledger |
/// | PIVOT_LOG_LEVEL | info | tracing level |
/// | PIVOT_LOG_DIR | (unset) | daily rolling log directory |
/// | ENVIRONMENT | development | development / staging / production; production logs JSON |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | grace period for in-flight requests |
///
/// ```ignore
/// PIVOT_HTTP_PORT=8080 PIVOT_LEDGER_PATH=./seed.json cargo run -p pivot-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// Ledger seed file; the ledger starts empty when unset
    pub ledger_path: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("PIVOT_HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3100),
            ledger_path: std::env::var("PIVOT_LEDGER_PATH")
                .ok()
                .filter(|p| !p.is_empty()),
            log_level: std::env::var("PIVOT_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("PIVOT_LOG_DIR").ok().filter(|p| !p.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override the port and seed, mostly for tests
    pub fn with_overrides(http_port: u16, ledger_path: Option<String>) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.ledger_path = ledger_path;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Structured JSON log lines instead of the human format
    pub fn json_logs(&self) -> bool {
        self.is_production()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str) -> Config {
        Config {
            http_port: 0,
            ledger_path: None,
            log_level: "info".into(),
            log_dir: None,
            environment: environment.into(),
            shutdown_timeout_ms: 100,
        }
    }

    #[test]
    fn test_only_production_logs_json() {
        assert!(config("production").json_logs());
        assert!(!config("development").json_logs());
        assert!(!config("staging").json_logs());
    }

    #[test]
    fn test_overrides_replace_port_and_seed() {
        let config = Config::with_overrides(4242, Some("seed.json".into()));
        assert_eq!(config.http_port, 4242);
        assert_eq!(config.ledger_path.as_deref(), Some("seed.json"));
    }
}
