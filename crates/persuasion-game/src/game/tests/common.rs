use std::sync::Arc;

use crate::config::EngineConfig;
use crate::game::domain::{Argument, DetectedTone, Sentiment, SentimentSignal, TextFeatures};
use crate::game::features::{KeywordFeatureExtractor, TextFeatureExtractor};
use crate::game::sentiment::{OracleError, RuleBasedOracle, SentimentOracle};
use crate::game::{ArgumentScorer, GameService};

pub(super) fn scorer() -> ArgumentScorer {
    ArgumentScorer::new(EngineConfig::default())
}

pub(super) fn signal(sentiment: Sentiment, confidence: f32) -> SentimentSignal {
    SentimentSignal {
        sentiment,
        sentiment_confidence: confidence,
        dominant_tone: DetectedTone::Formal,
        tone_confidence: 0.5,
    }
}

pub(super) fn features(word_count: u32, strong: u32, weak: u32, topic: u32) -> TextFeatures {
    TextFeatures {
        word_count,
        strong_pattern_hits: strong,
        weak_pattern_hits: weak,
        topic_keyword_hits: topic,
    }
}

/// Oracle standing in for a model backend that is offline.
pub(super) struct OfflineOracle;

impl SentimentOracle for OfflineOracle {
    fn analyze(&self, _text: &str) -> Result<SentimentSignal, OracleError> {
        Err(OracleError::Unavailable("model endpoint unreachable".to_string()))
    }
}

/// Oracle that answers, but with a confidence outside [0, 1].
pub(super) struct MiscalibratedOracle;

impl SentimentOracle for MiscalibratedOracle {
    fn analyze(&self, _text: &str) -> Result<SentimentSignal, OracleError> {
        Ok(signal(Sentiment::Positive, 1.2))
    }
}

/// Extractor reporting the same word count whatever the text.
pub(super) struct FixedCountExtractor(pub(super) u32);

impl TextFeatureExtractor for FixedCountExtractor {
    fn extract(&self, _argument: &Argument) -> TextFeatures {
        features(self.0, 0, 0, 0)
    }
}

pub(super) fn rule_based_service() -> GameService<RuleBasedOracle, KeywordFeatureExtractor> {
    GameService::new(
        Arc::new(RuleBasedOracle::new()),
        Arc::new(KeywordFeatureExtractor::new()),
        EngineConfig::default(),
    )
}

pub(super) fn offline_service() -> GameService<OfflineOracle, KeywordFeatureExtractor> {
    GameService::new(
        Arc::new(OfflineOracle),
        Arc::new(KeywordFeatureExtractor::new()),
        EngineConfig::default(),
    )
}
