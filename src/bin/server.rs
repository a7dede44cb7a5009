//! # Process Mining API Server
//!
//! Serves the dashboard REST API over PostgreSQL.
//!
//! ## Usage
//!
//! ```bash
//! # Run with config discovery (.env, config/process-mining.toml, environment)
//! cargo run --bin process-mining-server
//!
//! # Explicit config file and bind address
//! cargo run --bin process-mining-server -- --config config/production.toml --bind 0.0.0.0:9000
//! ```

use clap::Parser;
use std::env;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

use process_mining::config::ConfigLoader;
use process_mining::logging;
use process_mining::web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "process-mining-server")]
#[command(about = "Process mining dashboard API server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// TOML configuration file (overrides PROCESS_MINING_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides web.bind_address)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging comes up before configuration so loader output is visible
    let _ = dotenvy::dotenv();
    let environment =
        env::var("PROCESS_MINING__ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    logging::init_structured_logging(&environment);

    info!("Starting Process Mining API server");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let mut config = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from(Some(path)),
        None => ConfigLoader::load(),
    }
    .map_err(|e| format!("Failed to load configuration: {e}"))?;

    if let Some(bind) = cli.bind {
        config.web.bind_address = bind;
    }
    let bind_address = config.web.bind_address.clone();

    let state = AppState::from_config(config)
        .await
        .map_err(|e| format!("Failed to initialize application state: {e}"))?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| format!("Failed to bind {bind_address}: {e}"))?;

    info!("   Listening on: {}", bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Process Mining API server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
