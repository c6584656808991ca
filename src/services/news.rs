//! Headline sources for the sentiment scorer.

use async_trait::async_trait;
use backon::Retryable;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::sentiment::Headline;
use crate::services::error::ProviderError;
use crate::services::retry::RetryPolicy;

const MAX_ARTICLES: usize = 10;
const HOURS_BACK: i64 = 24;

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_headlines(&self, keywords: &[String]) -> Result<Vec<Headline>, ProviderError>;
}

/// Used when no news API key is configured; the scorer falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNewsProvider;

#[async_trait]
impl NewsProvider for NoNewsProvider {
    async fn fetch_headlines(&self, _keywords: &[String]) -> Result<Vec<Headline>, ProviderError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<ArticleSource>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

impl Article {
    fn into_headline(self) -> Option<Headline> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(Headline {
            title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            source: self.source.and_then(|s| s.name),
            url: self.url,
            published_at: self.published_at,
        })
    }
}

/// newsapi.org `/v2/everything` client
pub struct NewsApiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl NewsApiProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self, query: &str, from: &str) -> Result<Vec<Headline>, ProviderError> {
        let url = format!("{}/v2/everything", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("from", from),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(ProviderError::from_transport)?;
        let parsed: EverythingResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(parsed
            .articles
            .into_iter()
            .take(MAX_ARTICLES)
            .filter_map(Article::into_headline)
            .collect())
    }
}

/// `forex OR "central bank" OR ...`
pub fn build_query(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| {
            if k.contains(' ') {
                format!("\"{}\"", k)
            } else {
                k.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn fetch_headlines(&self, keywords: &[String]) -> Result<Vec<Headline>, ProviderError> {
        let query = build_query(keywords);
        let from = (Utc::now() - ChronoDuration::hours(HOURS_BACK)).to_rfc3339_opts(SecondsFormat::Secs, true);

        let headlines = (|| async { self.fetch_once(&query, &from).await })
            .retry(self.retry.backoff())
            .when(|e: &ProviderError| e.is_retryable())
            .notify(|e: &ProviderError, delay: Duration| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "News: retrying request");
            })
            .await?;

        debug!(count = headlines.len(), "News: fetched headlines");
        Ok(headlines)
    }
}
