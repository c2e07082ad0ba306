//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, server)
//! - Bind the listener and begin accepting traffic
//! - Wait for a shutdown signal, then drain within the grace period
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration arrives already validated
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{drain, Drained, Shutdown};
use crate::lifecycle::signals::wait_for_shutdown_signal;
use crate::observability::metrics;

/// Fatal errors while starting or running the proxy.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to initialize proxy: {0}")]
    Init(#[from] ProxyError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Server task failed during shutdown")]
    TaskFailed,

    #[error("In-flight requests did not drain within {0:?}")]
    DrainTimeout(Duration),
}

/// Run the proxy until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    tracing::info!(
        port = config.port,
        prometheus = %config.upstreams.prometheus.url,
        loki = %config.upstreams.loki.url,
        tempo = %config.upstreams.tempo.url,
        otlp = %config.upstreams.otlp.url,
        response_timeout_secs = config.upstream.response_timeout_secs,
        max_body_bytes = config.upstream.max_body_bytes,
        "Configuration loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let grace = Duration::from_secs(config.lifecycle.shutdown_grace_secs);

    let metrics_handle = metrics::init_metrics();
    let server = HttpServer::new(config, metrics_handle)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(address = %addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    tokio::select! {
        signal = wait_for_shutdown_signal() => {
            tracing::info!(signal, "Shutdown signal received");
        }
        result = &mut server_task => {
            // Server exited before any signal
            return match result {
                Ok(served) => served.map_err(StartupError::from),
                Err(_) => Err(StartupError::TaskFailed),
            };
        }
    }

    shutdown.trigger();

    match drain(server_task, grace).await {
        Drained::Completed(result) => result.map_err(StartupError::from),
        Drained::Failed => Err(StartupError::TaskFailed),
        Drained::TimedOut => Err(StartupError::DrainTimeout(grace)),
    }
}
