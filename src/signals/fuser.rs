//! Fuses indicator confirmations and news sentiment into a candidate signal.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FuserConfig;
use crate::models::indicators::IndicatorWindow;
use crate::models::sentiment::SentimentScore;
use crate::models::signal::{CandidateSignal, Direction};
use crate::signals::scoring::{calculate_confidence, ConfidenceBreakdown};
use crate::signals::timing::{entry_delay_seconds, expiry_seconds, volatility_regime};
use crate::signals::votes::{collect_votes, tally, Tally};

const MAX_REASONS: usize = 3;

/// Why a window did not produce a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoSignalReason {
    /// Neither direction reached the required confirmation count
    InsufficientConfirmations { up: usize, down: usize },
    /// Both directions did; treated as noise
    Conflicting { up: usize, down: usize },
    BelowThreshold {
        direction: Direction,
        confidence: f64,
        threshold: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuseOutcome {
    Signal(CandidateSignal),
    NoSignal(NoSignalReason),
}

impl FuseOutcome {
    pub fn signal(self) -> Option<CandidateSignal> {
        match self {
            FuseOutcome::Signal(signal) => Some(signal),
            FuseOutcome::NoSignal(_) => None,
        }
    }
}

pub struct SignalFuser {
    config: FuserConfig,
}

impl SignalFuser {
    pub fn new(config: FuserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FuserConfig {
        &self.config
    }

    /// Number of snapshots the fuser wants in its window
    pub fn window_ticks(&self) -> usize {
        self.config.freshness_ticks + 1
    }

    /// Vote tally for the current tick of the window
    pub fn tally(&self, window: &IndicatorWindow) -> Tally {
        tally(collect_votes(window, &self.config))
    }

    pub fn fuse<R: Rng + ?Sized>(
        &self,
        pair: &str,
        timeframe: &str,
        window: &IndicatorWindow,
        sentiment: &SentimentScore,
        rng: &mut R,
    ) -> FuseOutcome {
        let tally = self.tally(window);
        let up = tally.up.len();
        let down = tally.down.len();

        let direction = match tally.eligible(self.config.required_confirmations).as_slice() {
            [direction] => *direction,
            [] => {
                debug!(pair = pair, up = up, down = down, "Fuser: not enough confirmations");
                return FuseOutcome::NoSignal(NoSignalReason::InsufficientConfirmations { up, down });
            }
            _ => {
                debug!(pair = pair, up = up, down = down, "Fuser: conflicting confirmations");
                return FuseOutcome::NoSignal(NoSignalReason::Conflicting { up, down });
            }
        };

        let agreeing = tally.votes_for(direction);
        let breakdown: ConfidenceBreakdown = calculate_confidence(
            direction,
            agreeing,
            tally.total(),
            sentiment,
            &self.config.weights,
            self.config.freshness_ticks,
        );

        debug!(
            pair = pair,
            direction = %direction,
            agreement = breakdown.agreement,
            alignment = breakdown.alignment,
            freshness = breakdown.freshness,
            strength = breakdown.strength,
            confidence = breakdown.confidence,
            "Fuser: confidence breakdown"
        );

        if breakdown.confidence < self.config.confidence_threshold {
            return FuseOutcome::NoSignal(NoSignalReason::BelowThreshold {
                direction,
                confidence: breakdown.confidence,
                threshold: self.config.confidence_threshold,
            });
        }

        let current = window.current();
        let timing = &self.config.timing;
        let volatility = volatility_regime(current, timing);

        let reason = agreeing
            .iter()
            .take(MAX_REASONS)
            .map(|vote| vote.reason.as_str())
            .collect::<Vec<_>>()
            .join(" + ");

        FuseOutcome::Signal(CandidateSignal {
            pair: pair.to_string(),
            timeframe: timeframe.to_string(),
            direction,
            confidence: breakdown.confidence,
            confirmations: agreeing.iter().map(|vote| vote.kind).collect(),
            entry_delay_seconds: entry_delay_seconds(window, timing, rng),
            expiry_seconds: expiry_seconds(volatility, timing),
            reason,
            price: current.close,
            volatility,
        })
    }
}
