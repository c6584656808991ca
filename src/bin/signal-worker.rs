//! fxpulse Signal Worker
//!
//! Polls market data and news on an interval, fuses indicators into signals
//! and appends accepted ones to the JSON history.

use dotenvy::dotenv;
use fxpulse::config::Config;
use fxpulse::core::http::serve_metrics;
use fxpulse::core::runtime::SignalRuntime;
use fxpulse::display::format_signal;
use fxpulse::history::{JsonFileStore, SignalLedger};
use fxpulse::logging;
use fxpulse::metrics::Metrics;
use fxpulse::services::{
    MarketDataProvider, NewsApiProvider, NewsProvider, NoNewsProvider, YahooChartProvider,
};
use fxpulse::session::market_session;
use fxpulse::signals::SignalEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    let env = fxpulse::config::get_environment();
    info!("Starting fxpulse Signal Worker");
    info!(environment = %env, "Environment");
    info!(
        interval = config.runtime.evaluation_interval_seconds,
        "Signal Evaluation: every {} seconds", config.runtime.evaluation_interval_seconds
    );
    info!(pairs = ?config.runtime.pairs, "Pairs: {}", config.runtime.pairs.join(", "));

    let session = market_session(chrono::Utc::now());
    info!(sessions = ?session.sessions, volatility = ?session.volatility, "Current market session");

    let timeout = Duration::from_secs(config.providers.timeout_seconds);
    let market_data: Arc<dyn MarketDataProvider> = Arc::new(YahooChartProvider::new(
        config.providers.market_data_url.clone(),
        timeout,
    )?);
    let news: Arc<dyn NewsProvider> = match &config.providers.news_api_key {
        Some(key) => Arc::new(NewsApiProvider::new(
            config.providers.news_api_url.clone(),
            key.clone(),
            timeout,
        )?),
        None => {
            warn!("NEWS_API_KEY not set, sentiment will use the fallback score");
            Arc::new(NoNewsProvider)
        }
    };

    let store = JsonFileStore::new(config.rate_limit.history_path.clone());
    let ledger = SignalLedger::open(Box::new(store))?;
    info!(
        path = %config.rate_limit.history_path.display(),
        signals = ledger.len(),
        max_per_hour = config.rate_limit.max_per_hour,
        "Signal history opened"
    );

    let metrics = Arc::new(Metrics::new()?);
    let metrics_server = (config.runtime.metrics_port != 0).then(|| {
        let port = config.runtime.metrics_port;
        let metrics = metrics.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_metrics(port, metrics).await {
                error!(error = %e, "Worker metrics listener failed");
            }
        })
    });
    let engine = SignalEngine::new(&config, market_data, news).with_metrics(metrics);
    let mut runtime = SignalRuntime::new(
        config.runtime.clone(),
        engine,
        Arc::new(Mutex::new(ledger)),
    );

    let mut accepted = runtime.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(signal) = accepted.recv().await {
            println!("---\n{}\n", format_signal(&signal, chrono::Utc::now()));
        }
    });

    info!("Worker started, waiting for shutdown signal...");
    runtime
        .run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
        })
        .await;

    printer.abort();
    if let Some(handle) = metrics_server {
        handle.abort();
    }
    info!("Worker stopped");
    Ok(())
}
