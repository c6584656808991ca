//! Confidence blend for a direction that passed the confirmation count

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceWeights;
use crate::models::sentiment::SentimentScore;
use crate::models::signal::Direction;
use crate::signals::votes::Vote;

/// Every term of the blend, kept for logging and reason text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Agreeing votes / all votes cast, in [0, 1]
    pub agreement: f64,
    /// Sentiment polarity signed by direction, in [-1, 1]
    pub alignment: f64,
    /// Share of agreeing votes that are fresh, in [0, 1]
    pub freshness: f64,
    /// Share of agreeing votes that are strong, in [0, 1]
    pub strength: f64,
    pub confidence: f64,
}

/// Sentiment polarity from the point of view of `direction`.
///
/// Positive when the news leans the same way as the trade. Fallback scores
/// are scaled by `fallback_discount`.
pub fn sentiment_alignment(
    direction: Direction,
    sentiment: &SentimentScore,
    weights: &ConfidenceWeights,
) -> f64 {
    let alignment = sentiment.polarity.clamp(-1.0, 1.0) * direction.sign();
    if sentiment.is_fallback {
        alignment * weights.fallback_discount
    } else {
        alignment
    }
}

pub fn calculate_confidence(
    direction: Direction,
    agreeing: &[Vote],
    total_votes: usize,
    sentiment: &SentimentScore,
    weights: &ConfidenceWeights,
    freshness_ticks: usize,
) -> ConfidenceBreakdown {
    let share = |count: usize| {
        if agreeing.is_empty() {
            0.0
        } else {
            count as f64 / agreeing.len() as f64
        }
    };

    let agreement = if total_votes == 0 {
        0.0
    } else {
        agreeing.len() as f64 / total_votes as f64
    };
    let alignment = sentiment_alignment(direction, sentiment, weights);
    let freshness = share(agreeing.iter().filter(|v| v.is_fresh(freshness_ticks)).count());
    let strength = share(agreeing.iter().filter(|v| v.strong).count());

    let confidence = weights.base
        + weights.agreement * agreement
        + weights.sentiment * alignment
        + weights.freshness * freshness
        + weights.strength * strength;

    ConfidenceBreakdown {
        agreement,
        alignment,
        freshness,
        strength,
        confidence: confidence.clamp(0.0, 1.0),
    }
}
