//! HTTP server startup and shutdown

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::api::build_app;
use crate::core::{Config, ServerState};

pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Bind `0.0.0.0:<http_port>` and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;

        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down...");
            }
            trigger.cancel();
        });

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` fires
    ///
    /// In-flight requests get `shutdown_timeout_ms` to finish.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, environment = %self.config.environment, "Pivot server listening");

        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        let app = build_app(self.state);
        let signal = shutdown.clone();

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            signal.cancelled().await;
        })
        .into_future();

        tokio::select! {
            result = server => result?,
            _ = grace_expired(shutdown, grace) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Shutdown grace period expired"
                );
            }
        }
        tracing::info!("Pivot server stopped");
        Ok(())
    }
}

fn grace_expired(shutdown: CancellationToken, grace: Duration) -> impl Future<Output = ()> {
    async move {
        shutdown.cancelled().await;
        tokio::time::sleep(grace).await;
    }
}
