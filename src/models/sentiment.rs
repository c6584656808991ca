use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate news polarity for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Mean polarity in [-1, 1]
    pub polarity: f64,
    pub sample_count: usize,
    /// Set when no usable headlines were available and the fixed fallback was used
    pub is_fallback: bool,
}

impl SentimentScore {
    pub fn fallback(polarity: f64) -> Self {
        Self {
            polarity: polarity.clamp(-1.0, 1.0),
            sample_count: 0,
            is_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            source: None,
            url: None,
            published_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Title and description joined, the unit the scorer works on
    pub fn text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.title, description),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// News pressure on a single currency pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewsImpact {
    pub level: ImpactLevel,
    pub sentiment: f64,
    pub relevant_articles: usize,
}
