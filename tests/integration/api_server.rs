//! Integration tests for the API Server
//!
//! Tests health, metrics and the signal history endpoints.


use axum_test::TestServer;
use chrono::{Duration, Utc};
use fxpulse::core::http::metrics_router;
use fxpulse::metrics::Metrics;
use fxpulse::models::signal::{AcceptedSignal, Direction};
use serde_json::Value;
use std::sync::Arc;

use crate::test_utils::accepted;
use test_utils::TestApiServer;

fn history() -> Vec<AcceptedSignal> {
    let now = Utc::now();
    vec![
        accepted("GBPUSD=X", Direction::Up, 0.78, now - Duration::days(3)),
        accepted("EURUSD=X", Direction::Down, 0.82, now - Duration::days(2)),
        accepted("EURUSD=X", Direction::Up, 0.91, now),
    ]
}

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::with_history(history()).await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["signals"], 3);
    assert_eq!(body["service"], "fxpulse-signal-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("http_request_duration_seconds"),
        "Expected http_request_duration_seconds metric"
    );
    assert!(
        body.contains("signals_accepted_total"),
        "Expected signals_accepted_total metric"
    );
}

#[tokio::test]
async fn metrics_endpoint_tracks_request_count() {
    let app = TestApiServer::new().await;

    for _ in 0..3 {
        let _ = app.server.get("/health").await;
    }

    assert_eq!(app.metrics.http_requests_total.get(), 3);
    assert_eq!(app.metrics.http_requests_in_flight.get(), 0);
}

#[tokio::test]
async fn signals_are_listed_newest_first() {
    let app = TestApiServer::with_history(history()).await;
    let response = app.server.get("/api/signals").await;
    assert_eq!(response.status_code(), 200);

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["confidence"], 0.91);
    assert_eq!(body[0]["direction"], "UP");
    assert_eq!(body[2]["pair"], "GBPUSD=X");
    assert!(body[0]["id"].is_string());
    assert!(body[0]["emitted_at"].is_string());
}

#[tokio::test]
async fn signals_limit_is_applied() {
    let app = TestApiServer::with_history(history()).await;
    let response = app.server.get("/api/signals").add_query_param("limit", 1).await;

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["confidence"], 0.91);
}

#[tokio::test]
async fn signals_filter_by_pair_in_either_format() {
    let app = TestApiServer::with_history(history()).await;

    let by_display: Vec<Value> = app
        .server
        .get("/api/signals")
        .add_query_param("pair", "EUR/USD")
        .await
        .json();
    let by_symbol: Vec<Value> = app
        .server
        .get("/api/signals")
        .add_query_param("pair", "EURUSD=X")
        .await
        .json();

    assert_eq!(by_display.len(), 2);
    assert_eq!(by_display, by_symbol);
    assert!(by_display.iter().all(|s| s["pair"] == "EURUSD=X"));
}

#[tokio::test]
async fn todays_signals_only() {
    let app = TestApiServer::with_history(history()).await;
    let body: Vec<Value> = app.server.get("/api/signals/today").await.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["confidence"], 0.91);
}

#[tokio::test]
async fn stats_include_rate_limit_window() {
    let app = TestApiServer::with_history(history()).await;
    let response = app.server.get("/api/signals/stats").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["total_signals"], 3);
    assert_eq!(body["up_signals"], 2);
    assert_eq!(body["down_signals"], 1);
    assert_eq!(body["signals_last_hour"], 1);
    assert_eq!(body["max_per_hour"], 3);
    assert_eq!(body["pairs"]["EURUSD=X"]["count"], 2);
}

#[tokio::test]
async fn empty_history_has_empty_stats() {
    let app = TestApiServer::new().await;
    let body: Value = app.server.get("/api/signals/stats").await.json();
    assert_eq!(body["total_signals"], 0);
    assert_eq!(body["signals_last_hour"], 0);

    let signals: Vec<Value> = app.server.get("/api/signals").await.json();
    assert!(signals.is_empty());
}

#[tokio::test]
async fn endpoints_reflect_new_records() {
    let app = TestApiServer::new().await;
    app.ledger
        .lock()
        .await
        .append(accepted("USDJPY=X", Direction::Down, 0.88, Utc::now()))
        .unwrap();

    let body: Vec<Value> = app.server.get("/api/signals").await.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["pair"], "USDJPY=X");
}

#[tokio::test]
async fn worker_metrics_router_serves_cycle_counters() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    metrics.cycles_total.inc();
    let server = TestServer::new(metrics_router(metrics)).expect("start test server");

    let response = server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("fxpulse_cycles_total 1"));

    let missing = server.get("/api/signals").await;
    assert_eq!(missing.status_code(), 404);
}
