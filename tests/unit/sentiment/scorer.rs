//! Unit tests for the sentiment scorer and lexicon model

use fxpulse::config::SentimentConfig;
use fxpulse::models::sentiment::ImpactLevel;
use fxpulse::sentiment::{split_pair, LexiconModel, PolarityModel, SentimentScorer};
use std::sync::Arc;

fn scorer() -> SentimentScorer {
    SentimentScorer::new(&SentimentConfig::default())
}

#[test]
fn test_lexicon_positive_and_negative() {
    let model = LexiconModel::new();
    assert_eq!(model.polarity("Euro rally gains strength"), 1.0);
    assert_eq!(model.polarity("Dollar falls amid recession fears"), -1.0);
    assert_eq!(model.polarity("Markets open on Monday"), 0.0);
}

#[test]
fn test_lexicon_mixed_text_is_balanced() {
    let model = LexiconModel::new();
    assert_eq!(model.polarity("Yen gains while pound falls"), 0.0);
}

#[test]
fn test_lexicon_negator_flips_next_word() {
    let model = LexiconModel::new();
    assert_eq!(model.polarity("ECB does not expect a recovery"), -1.0);
    assert_eq!(model.polarity("no recession in sight"), 1.0);
}

#[test]
fn test_empty_headlines_use_fallback() {
    let score = scorer().score::<&str>(&[]);
    assert!(score.is_fallback);
    assert_eq!(score.sample_count, 0);
    assert!((score.polarity - 0.05).abs() < 1e-12);
}

#[test]
fn test_irrelevant_headlines_use_fallback() {
    let score = scorer().score(&["Local football team wins the cup"]);
    assert!(score.is_fallback);
}

#[test]
fn test_relevant_headlines_are_averaged() {
    let score = scorer().score(&[
        "Forex traders cheer strong GDP growth",
        "Currency markets slump on inflation fears",
        "Celebrity gossip of the day",
    ]);
    assert!(!score.is_fallback);
    assert_eq!(score.sample_count, 2);
    assert!(score.polarity.abs() < 1e-12);
}

#[test]
fn test_keyword_match_is_case_insensitive() {
    let scorer = scorer();
    assert!(scorer.is_relevant("FEDERAL RESERVE holds rates"));
    assert!(scorer.is_relevant("eur/usd climbs"));
    assert!(!scorer.is_relevant("Weather is sunny"));
}

#[test]
fn test_polarity_is_bounded() {
    struct Loud;
    impl PolarityModel for Loud {
        fn polarity(&self, _text: &str) -> f64 {
            5.0
        }
    }

    let scorer = SentimentScorer::with_model(&SentimentConfig::default(), Arc::new(Loud));
    let score = scorer.score(&["forex news"]);
    assert_eq!(score.polarity, 1.0);
}

#[test]
fn test_split_pair_formats() {
    let eur_usd = Some(("EUR".to_string(), "USD".to_string()));
    assert_eq!(split_pair("EURUSD=X"), eur_usd);
    assert_eq!(split_pair("EUR/USD"), eur_usd);
    assert_eq!(split_pair("eurusd"), eur_usd);
    assert_eq!(split_pair("BTC"), None);
}

#[test]
fn test_pair_impact_levels() {
    let scorer = scorer();

    let high = scorer.impact_for_pair(&["EUR surges on strong data"], "EURUSD=X");
    assert_eq!(high.level, ImpactLevel::High);
    assert_eq!(high.relevant_articles, 1);

    let none = scorer.impact_for_pair(&["JPY weakens"], "EURUSD=X");
    assert_eq!(none.level, ImpactLevel::Low);
    assert_eq!(none.relevant_articles, 0);
}
