use anyhow::Context;
use pivot_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        config.json_logs(),
        config.log_dir.as_deref(),
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.http_port,
        environment = %config.environment,
        "Pivot server starting"
    );

    let state = ServerState::initialize(&config).context("failed to initialize server state")?;

    if let Err(e) = Server::with_state(config, state).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }
    Ok(())
}
