//! Word-list polarity model. Other models plug in through `PolarityModel`.

/// Scores one piece of text in [-1, 1]
pub trait PolarityModel: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

const POSITIVE: &[&str] = &[
    "gain", "gains", "rally", "rallies", "surge", "surges", "rise", "rises", "rising",
    "strong", "stronger", "strengthens", "strength", "high", "higher", "boost", "boosts",
    "growth", "grows", "optimism", "optimistic", "recovery", "recovers", "upbeat", "beat",
    "beats", "positive", "improve", "improves", "improved", "bullish", "record", "robust",
    "steady", "stable", "jump", "jumps", "climb", "climbs", "good", "best",
];

const NEGATIVE: &[&str] = &[
    "loss", "losses", "fall", "falls", "falling", "drop", "drops", "plunge", "plunges",
    "weak", "weaker", "weakens", "weakness", "low", "lower", "cut", "cuts", "slump",
    "slumps", "fear", "fears", "concern", "concerns", "crisis", "recession", "decline",
    "declines", "negative", "bearish", "slowdown", "risk", "risks", "miss", "misses",
    "tumble", "tumbles", "sell-off", "selloff", "bad", "worst", "uncertainty", "easing",
];

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly", "fails", "failed"];

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }
}

impl PolarityModel for LexiconModel {
    /// (positive hits - negative hits) / total hits, with a negator flipping
    /// the next sentiment word. No hits scores 0.
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut positive = 0usize;
        let mut negative = 0usize;
        let mut negate = false;

        for token in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|t| !t.is_empty())
        {
            if NEGATORS.contains(&token) {
                negate = true;
                continue;
            }

            let sign = if POSITIVE.contains(&token) {
                1
            } else if NEGATIVE.contains(&token) {
                -1
            } else {
                continue;
            };

            match (sign > 0) != negate {
                true => positive += 1,
                false => negative += 1,
            }
            negate = false;
        }

        let total = positive + negative;
        if total == 0 {
            return 0.0;
        }
        (positive as f64 - negative as f64) / total as f64
    }
}
