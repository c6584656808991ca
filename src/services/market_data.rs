//! Market data provider interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::indicators::PricePoint;
use crate::services::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataRequest {
    pub symbol: String,
    /// Bar width as the provider spells it, e.g. "1m"
    pub interval: String,
    pub lookback_count: usize,
}

impl MarketDataRequest {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, lookback_count: usize) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            lookback_count,
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// At most `lookback_count` bars, oldest first
    async fn get_candles(&self, request: &MarketDataRequest) -> Result<Vec<PricePoint>, ProviderError>;
}

/// Serves a fixed series, trimmed to the requested lookback. Useful offline.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketDataProvider {
    points: Vec<PricePoint>,
}

impl StaticMarketDataProvider {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    async fn get_candles(&self, request: &MarketDataRequest) -> Result<Vec<PricePoint>, ProviderError> {
        if self.points.is_empty() {
            return Err(ProviderError::EmptyResponse(request.symbol.clone()));
        }
        let start = self.points.len().saturating_sub(request.lookback_count);
        Ok(self.points[start..].to_vec())
    }
}
