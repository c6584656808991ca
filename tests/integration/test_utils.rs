//! Shared builders and provider doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fxpulse::models::indicators::PricePoint;
use fxpulse::models::sentiment::Headline;
use fxpulse::models::signal::{AcceptedSignal, CandidateSignal, Direction, IndicatorKind, VolatilityRegime};
use fxpulse::services::{MarketDataProvider, MarketDataRequest, NewsProvider, ProviderError};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wednesday afternoon UTC, London and New York both open
pub fn wednesday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 14, 0, 0).unwrap()
}

pub fn saturday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 13, 14, 0, 0).unwrap()
}

pub fn series_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    let start = wednesday() - Duration::minutes(closes.len() as i64);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            PricePoint::new(
                close,
                close + 0.0002,
                close - 0.0002,
                close,
                1000.0,
                start + Duration::minutes(i as i64),
            )
        })
        .collect()
}

/// Steady climb that accelerates, breaks out through the upper Bollinger
/// band, then closes back inside it. RSI stays above 80, so the current tick
/// carries a strong RSI and a Bollinger bounce DOWN vote against one MA UP
/// vote.
pub fn exhausted_rally() -> Vec<PricePoint> {
    let step = 0.0005;
    let mut closes: Vec<f64> = (0..41).map(|i| 1.1 + step * i as f64).collect();
    for _ in 41..60 {
        let last = closes[closes.len() - 1];
        closes.push(last + 2.0 * step);
    }
    let last = closes[closes.len() - 1];
    closes.push(last + 22.0 * step);
    closes.push(last + 16.0 * step);
    series_from_closes(&closes)
}

/// The climb of `exhausted_rally` cut at the breakout bar
pub fn upper_breakout() -> Vec<PricePoint> {
    let mut points = exhausted_rally();
    points.pop();
    points
}

/// Smoothly accelerating climb inside the bands: RSI votes DOWN, the MA
/// trend votes UP and nothing else fires.
pub fn smooth_uptrend() -> Vec<PricePoint> {
    let closes: Vec<f64> = (0..60).map(|i| 1.1 + 0.00001 * (i * i) as f64).collect();
    series_from_closes(&closes)
}

/// Serves the same series for every symbol
pub struct FixedSeriesProvider {
    pub points: Vec<PricePoint>,
    pub requests: AtomicUsize,
}

impl FixedSeriesProvider {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self {
            points,
            requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MarketDataProvider for FixedSeriesProvider {
    async fn get_candles(&self, request: &MarketDataRequest) -> Result<Vec<PricePoint>, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let start = self.points.len().saturating_sub(request.lookback_count);
        Ok(self.points[start..].to_vec())
    }
}

/// Fails for the listed symbols, serves `points` for the rest
pub struct PartialOutageProvider {
    pub failing: Vec<String>,
    pub points: Vec<PricePoint>,
}

#[async_trait]
impl MarketDataProvider for PartialOutageProvider {
    async fn get_candles(&self, request: &MarketDataRequest) -> Result<Vec<PricePoint>, ProviderError> {
        if self.failing.contains(&request.symbol) {
            return Err(ProviderError::Status(503));
        }
        Ok(self.points.clone())
    }
}

pub struct StaticNewsProvider {
    pub titles: Vec<String>,
}

impl StaticNewsProvider {
    pub fn new(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn bearish() -> Self {
        Self::new(&[
            "Forex traders fear crisis as currency falls",
            "Dollar slump deepens on recession concerns",
        ])
    }
}

#[async_trait]
impl NewsProvider for StaticNewsProvider {
    async fn fetch_headlines(&self, _keywords: &[String]) -> Result<Vec<Headline>, ProviderError> {
        Ok(self.titles.iter().map(Headline::new).collect())
    }
}

pub struct FailingNewsProvider;

#[async_trait]
impl NewsProvider for FailingNewsProvider {
    async fn fetch_headlines(&self, _keywords: &[String]) -> Result<Vec<Headline>, ProviderError> {
        Err(ProviderError::Status(429))
    }
}

pub fn accepted(pair: &str, direction: Direction, confidence: f64, at: DateTime<Utc>) -> AcceptedSignal {
    AcceptedSignal::new(
        CandidateSignal {
            pair: pair.to_string(),
            timeframe: "M1".to_string(),
            direction,
            confidence,
            confirmations: BTreeSet::from([IndicatorKind::Rsi, IndicatorKind::Bollinger]),
            entry_delay_seconds: 30,
            expiry_seconds: 120,
            reason: "RSI overbought reversal + Bollinger upper band bounce".to_string(),
            price: 1.1019,
            volatility: VolatilityRegime::Medium,
        },
        at,
    )
}

/// Yahoo chart response with one bar per minute; `None` closes become nulls
pub fn yahoo_chart(closes: &[Option<f64>]) -> Value {
    let start = wednesday().timestamp();
    let timestamps: Vec<i64> = (0..closes.len()).map(|i| start + 60 * i as i64).collect();
    let open: Vec<Value> = closes.iter().map(|c| json!(c)).collect();
    let high: Vec<Value> = closes.iter().map(|c| json!(c.map(|v| v + 0.0002))).collect();
    let low: Vec<Value> = closes.iter().map(|c| json!(c.map(|v| v - 0.0002))).collect();
    let volume: Vec<Value> = closes.iter().map(|_| json!(0)).collect();

    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "EURUSD=X" },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": open,
                        "high": high,
                        "low": low,
                        "close": open,
                        "volume": volume
                    }]
                }
            }],
            "error": null
        }
    })
}
