//! Telemetry gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                  TELEMETRY GATEWAY                    │
//!                    │                                                       │
//!   Client Request   │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ─────────────────┼─▶│  http   │───▶│ routing  │───▶│ proxy (inject  │───┼──▶ Prometheus
//!                    │  │ server  │    │  table   │    │ auth + tenant) │   │    Loki
//!   Client Response  │  │         │◀───┼──────────┼────│   streamed     │◀──┼─── Tempo
//!   ◀────────────────┼──│         │    └──────────┘    └────────────────┘   │    OTLP
//!                    │  └─────────┘                                         │
//!                    │  /health  /ready  /metrics                           │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use telemetry_gateway::config::{loader, ConfigError, ProxyConfig};
use telemetry_gateway::lifecycle;
use telemetry_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "telemetry-gateway")]
#[command(about = "Multi-tenant reverse proxy for observability backends", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it, configuration is read from the environment.
    #[arg(short, long, env = "PROXY_CONFIG")]
    config: Option<PathBuf>,
}

fn load(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    match &cli.config {
        Some(path) => loader::load_config(path),
        None => loader::from_env(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "telemetry-gateway starting");

    match lifecycle::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "telemetry-gateway exited with error");
            ExitCode::FAILURE
        }
    }
}
