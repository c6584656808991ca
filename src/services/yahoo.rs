//! Yahoo Finance chart API adapter.

use async_trait::async_trait;
use backon::Retryable;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::indicators::PricePoint;
use crate::services::error::ProviderError;
use crate::services::market_data::{MarketDataProvider, MarketDataRequest};
use crate::services::retry::RetryPolicy;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl YahooChartProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; fxpulse)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_chart(&self, request: &MarketDataRequest) -> Result<Vec<PricePoint>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, request.symbol);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("interval", request.interval.as_str()),
                ("range", range_for(&request.interval)),
            ])
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(ProviderError::from_transport)?;
        let envelope: ChartEnvelope =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        parse_chart(envelope, &request.symbol)
    }
}

/// Smallest range Yahoo accepts that still covers a useful number of bars
fn range_for(interval: &str) -> &'static str {
    match interval {
        "1m" | "2m" => "1d",
        "5m" | "15m" => "5d",
        "30m" | "60m" | "90m" | "1h" => "1mo",
        _ => "6mo",
    }
}

fn parse_chart(envelope: ChartEnvelope, symbol: &str) -> Result<Vec<PricePoint>, ProviderError> {
    if let Some(error) = envelope.chart.error {
        return Err(ProviderError::Decode(
            error.description.unwrap_or_else(|| "chart error".to_string()),
        ));
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| ProviderError::EmptyResponse(symbol.to_string()))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();
    let mut points = Vec::with_capacity(result.timestamp.len());
    let mut dropped = 0usize;

    for (i, ts) in result.timestamp.iter().enumerate() {
        let bar = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
            Utc.timestamp_opt(*ts, 0).single(),
        );
        match bar {
            (Some(open), Some(high), Some(low), Some(close), Some(timestamp)) => {
                // Forex quotes often carry no volume
                let volume = at(&quote.volume, i).unwrap_or(0.0);
                points.push(PricePoint::new(open, high, low, close, volume, timestamp));
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(symbol = symbol, dropped = dropped, "Yahoo: dropped incomplete bars");
    }
    if points.is_empty() {
        return Err(ProviderError::EmptyResponse(symbol.to_string()));
    }
    Ok(points)
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn get_candles(&self, request: &MarketDataRequest) -> Result<Vec<PricePoint>, ProviderError> {
        let mut points = (|| async { self.fetch_chart(request).await })
            .retry(self.retry.backoff())
            .when(|e: &ProviderError| e.is_retryable())
            .notify(|e: &ProviderError, delay: Duration| {
                warn!(
                    symbol = %request.symbol,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Yahoo: retrying chart request"
                );
            })
            .await?;

        let start = points.len().saturating_sub(request.lookback_count);
        points.drain(..start);
        Ok(points)
    }
}
