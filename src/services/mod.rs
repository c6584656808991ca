//! Network collaborators: market data and news.

pub mod error;
pub mod market_data;
pub mod news;
pub mod retry;
pub mod yahoo;

pub use error::ProviderError;
pub use market_data::{MarketDataProvider, MarketDataRequest, StaticMarketDataProvider};
pub use news::{NewsApiProvider, NewsProvider, NoNewsProvider};
pub use retry::RetryPolicy;
pub use yahoo::YahooChartProvider;
