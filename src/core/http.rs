//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::config::Config;
use crate::history::{HistoryStats, JsonFileStore, RateLimitWindow, SignalLedger};
use crate::metrics::Metrics;
use crate::models::signal::AcceptedSignal;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<SignalLedger>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub max_per_hour: usize,
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let signals = state.ledger.lock().await.len();
    Ok(Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "signals": signals,
        "service": "fxpulse-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn export_metrics(State(metrics): State<Arc<Metrics>>) -> Result<String, StatusCode> {
    metrics.export().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct SignalQuery {
    pair: Option<String>,
    limit: Option<usize>,
}

/// Lock the ledger and pick up whatever the worker has written since
async fn fresh_ledger(state: &AppState) -> Result<MutexGuard<'_, SignalLedger>, StatusCode> {
    let mut ledger = state.ledger.lock().await;
    ledger.reload().map_err(|e| {
        error!(error = %e, "Failed to reload signal history");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(ledger)
}

/// Recent signals, newest first, optionally for one pair
async fn list_signals(
    State(state): State<AppState>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<Vec<AcceptedSignal>>, StatusCode> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let ledger = fresh_ledger(&state).await?;

    let signals = match params.pair.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(pair) => ledger.by_pair(pair, limit),
        None => ledger.recent(limit),
    };
    Ok(Json(signals))
}

async fn signals_today(State(state): State<AppState>) -> Result<Json<Vec<AcceptedSignal>>, StatusCode> {
    let ledger = fresh_ledger(&state).await?;
    Ok(Json(ledger.today(Utc::now())))
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: HistoryStats,
    signals_last_hour: usize,
    max_per_hour: usize,
}

async fn signal_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, StatusCode> {
    let ledger = fresh_ledger(&state).await?;
    let now = Utc::now();
    let last_hour = RateLimitWindow::measure(ledger.records(), now, Duration::hours(1));
    Ok(Json(StatsResponse {
        stats: ledger.stats(now),
        signals_last_hour: last_hour.count,
        max_per_hour: state.max_per_hour,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(list_signals))
        .route("/api/signals/today", get(signals_today))
        .route("/api/signals/stats", get(signal_stats))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// `/metrics` on its own, for the signal worker's registry
pub fn metrics_router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/metrics", get(export_metrics))
        .with_state(metrics)
}

pub async fn serve_metrics(port: u16, metrics: Arc<Metrics>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(port = port, "Worker metrics available at http://0.0.0.0:{}/metrics", port);
    axum::serve(listener, metrics_router(metrics)).await
}

pub async fn start_server(port: u16, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let store = JsonFileStore::new(config.rate_limit.history_path.clone());
    let ledger = SignalLedger::open(Box::new(store))?;
    info!(
        path = %config.rate_limit.history_path.display(),
        signals = ledger.len(),
        "Signal history opened"
    );

    let state = AppState {
        ledger: Arc::new(Mutex::new(ledger)),
        metrics,
        start_time: Arc::new(Instant::now()),
        max_per_hour: config.rate_limit.max_per_hour,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
