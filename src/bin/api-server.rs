//! fxpulse API Server
//!
//! Read-only HTTP view of the signal history with health check and metrics.
//! The signal worker runs as a separate process and writes the history file.

use dotenvy::dotenv;
use fxpulse::config::{get_environment, Config};
use fxpulse::core::http::start_server;
use fxpulse::logging;
use std::env;
use tokio::signal;
use tracing::{error, info};

fn port_from_env() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let port = port_from_env();
    info!(
        environment = %get_environment(),
        port = port,
        history = %config.rate_limit.history_path.display(),
        max_per_hour = config.rate_limit.max_per_hour,
        "Starting fxpulse API Server"
    );

    tokio::select! {
        result = start_server(port, config) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(e);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
    }

    Ok(())
}
