use std::sync::Arc;

use tracing::debug;

use crate::config::SentimentConfig;
use crate::models::sentiment::{ImpactLevel, NewsImpact, SentimentScore};
use crate::sentiment::lexicon::{LexiconModel, PolarityModel};

const HIGH_IMPACT: f64 = 0.3;
const MEDIUM_IMPACT: f64 = 0.1;

/// Maps a batch of headlines to one polarity score
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn PolarityModel>,
    keywords: Vec<String>,
    fallback_polarity: f64,
}

impl SentimentScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self::with_model(config, Arc::new(LexiconModel::new()))
    }

    pub fn with_model(config: &SentimentConfig, model: Arc<dyn PolarityModel>) -> Self {
        Self {
            model,
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
            fallback_polarity: config.fallback_polarity,
        }
    }

    /// Lower-cased relevance keywords, also used as the news query
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_relevant(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Mean polarity of the forex-relevant texts.
    ///
    /// With nothing relevant to score, returns the configured fallback with
    /// `is_fallback` set so the fuser can down-weight it.
    pub fn score<S: AsRef<str>>(&self, texts: &[S]) -> SentimentScore {
        let polarities: Vec<f64> = texts
            .iter()
            .map(AsRef::as_ref)
            .filter(|text| self.is_relevant(text))
            .map(|text| self.model.polarity(text).clamp(-1.0, 1.0))
            .collect();

        if polarities.is_empty() {
            debug!(
                received = texts.len(),
                fallback = self.fallback_polarity,
                "Sentiment: no relevant headlines, using fallback"
            );
            return SentimentScore::fallback(self.fallback_polarity);
        }

        let polarity = polarities.iter().sum::<f64>() / polarities.len() as f64;
        debug!(
            received = texts.len(),
            scored = polarities.len(),
            polarity = polarity,
            "Sentiment: scored headlines"
        );

        SentimentScore {
            polarity: polarity.clamp(-1.0, 1.0),
            sample_count: polarities.len(),
            is_fallback: false,
        }
    }

    /// News pressure on one pair: mean polarity of texts naming either leg
    pub fn impact_for_pair<S: AsRef<str>>(&self, texts: &[S], pair: &str) -> NewsImpact {
        let Some((base, quote)) = split_pair(pair) else {
            return NewsImpact {
                level: ImpactLevel::Low,
                sentiment: 0.0,
                relevant_articles: 0,
            };
        };

        let polarities: Vec<f64> = texts
            .iter()
            .map(AsRef::as_ref)
            .filter(|text| {
                let upper = text.to_uppercase();
                upper.contains(&base) || upper.contains(&quote)
            })
            .map(|text| self.model.polarity(text).clamp(-1.0, 1.0))
            .collect();

        if polarities.is_empty() {
            return NewsImpact {
                level: ImpactLevel::Low,
                sentiment: 0.0,
                relevant_articles: 0,
            };
        }

        let sentiment = polarities.iter().sum::<f64>() / polarities.len() as f64;
        let level = if sentiment.abs() > HIGH_IMPACT {
            ImpactLevel::High
        } else if sentiment.abs() > MEDIUM_IMPACT {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        };

        NewsImpact {
            level,
            sentiment,
            relevant_articles: polarities.len(),
        }
    }
}

/// "EURUSD=X", "EUR/USD" or "eurusd" -> ("EUR", "USD")
pub fn split_pair(pair: &str) -> Option<(String, String)> {
    let symbol = pair.split('=').next().unwrap_or(pair);
    let letters: String = symbol
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if letters.len() < 6 {
        return None;
    }
    Some((letters[..3].to_string(), letters[3..6].to_string()))
}
