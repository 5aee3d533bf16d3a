//! Sentiment and tone analysis backends.
//!
//! The scorer only depends on [`SentimentSignal`]; which backend produces it is
//! decided where the [`crate::game::GameService`] is constructed.

use super::domain::{DetectedTone, Sentiment, SentimentSignal};
use crate::error::EngineError;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "love",
    "like",
    "happy",
    "positive",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "dislike", "sad", "negative", "wrong", "horrible",
];

const TONE_PATTERNS: &[(DetectedTone, &[&str])] = &[
    (
        DetectedTone::Polite,
        &["please", "thank you", "kindly", "would you", "could you", "may i"],
    ),
    (
        DetectedTone::Passionate,
        &[
            "believe",
            "think",
            "feel",
            "strongly",
            "convinced",
            "certain",
            "love",
            "hate",
        ],
    ),
    (
        DetectedTone::Formal,
        &[
            "therefore",
            "consequently",
            "furthermore",
            "moreover",
            "thus",
            "hence",
        ],
    ),
    (
        DetectedTone::Casual,
        &["hey", "cool", "awesome", "great", "nice", "yeah", "okay"],
    ),
    (
        DetectedTone::Confrontational,
        &[
            "wrong",
            "false",
            "never",
            "always",
            "impossible",
            "ridiculous",
            "stupid",
        ],
    ),
];

/// Failure of a sentiment backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    #[error("sentiment backend unavailable: {0}")]
    Unavailable(String),
    #[error("sentiment backend returned malformed output: {0}")]
    Malformed(String),
}

impl From<OracleError> for EngineError {
    fn from(value: OracleError) -> Self {
        EngineError::DependencyUnavailable(value.to_string())
    }
}

/// Capability producing a sentiment and tone reading for a text.
pub trait SentimentOracle: Send + Sync {
    fn analyze(&self, text: &str) -> Result<SentimentSignal, OracleError>;
}

/// Keyword ratio heuristics; never fails.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedOracle;

impl RuleBasedOracle {
    pub fn new() -> Self {
        Self
    }

    fn sentiment(text: &str) -> (Sentiment, f32) {
        let lowered = text.to_lowercase();
        let total_words = text.split_whitespace().count();
        if total_words == 0 {
            return (Sentiment::Neutral, 0.5);
        }

        let positive = POSITIVE_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .count() as f32
            / total_words as f32;
        let negative = NEGATIVE_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .count() as f32
            / total_words as f32;

        if positive > negative && positive > 0.1 {
            (Sentiment::Positive, (positive * 5.0).min(0.9))
        } else if negative > positive && negative > 0.1 {
            (Sentiment::Negative, (negative * 5.0).min(0.9))
        } else {
            (Sentiment::Neutral, 0.6)
        }
    }
}

impl SentimentOracle for RuleBasedOracle {
    fn analyze(&self, text: &str) -> Result<SentimentSignal, OracleError> {
        let (sentiment, sentiment_confidence) = Self::sentiment(text);
        let (dominant_tone, tone_confidence) = dominant_tone(text);
        Ok(SentimentSignal {
            sentiment,
            sentiment_confidence,
            dominant_tone,
            tone_confidence,
        })
    }
}

/// Pattern-based tone detection shared by every backend.
///
/// Ties resolve to the earlier tone in [`DetectedTone::ALL`]; a text with no
/// tone markers reports `Polite` at confidence 0.
pub fn dominant_tone(text: &str) -> (DetectedTone, f32) {
    let lowered = text.to_lowercase();
    let raw: Vec<(DetectedTone, f32)> = TONE_PATTERNS
        .iter()
        .map(|(tone, patterns)| {
            let matches = patterns
                .iter()
                .filter(|pattern| lowered.contains(*pattern))
                .count() as f32;
            (*tone, (matches * 0.3).min(1.0))
        })
        .collect();

    let max = raw.iter().map(|(_, score)| *score).fold(0.0_f32, f32::max);
    let mut best = (DetectedTone::Polite, 0.0_f32);
    for (tone, score) in raw {
        let normalized = if max > 0.0 { score / max } else { 0.0 };
        if normalized > best.1 {
            best = (tone, normalized);
        }
    }
    best
}

/// Classifier returning `[negative, neutral, positive]` probabilities.
pub trait SentimentModel: Send + Sync {
    fn class_probabilities(&self, text: &str) -> Result<[f32; 3], OracleError>;
}

/// Wraps a classification model; tone still comes from [`dominant_tone`].
pub struct ModelBackedOracle<M> {
    model: M,
}

impl<M: SentimentModel> ModelBackedOracle<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl<M: SentimentModel> SentimentOracle for ModelBackedOracle<M> {
    fn analyze(&self, text: &str) -> Result<SentimentSignal, OracleError> {
        let probabilities = self.model.class_probabilities(text)?;
        if probabilities
            .iter()
            .any(|p| !p.is_finite() || !(0.0..=1.0).contains(p))
        {
            return Err(OracleError::Malformed(format!(
                "class probabilities out of range: {probabilities:?}"
            )));
        }

        let labels = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];
        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((1, f32::MIN), |best, (index, p)| {
                if p > best.1 {
                    (index, p)
                } else {
                    best
                }
            });

        let (dominant_tone, tone_confidence) = dominant_tone(text);
        Ok(SentimentSignal {
            sentiment: labels[index],
            sentiment_confidence: confidence,
            dominant_tone,
            tone_confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(Result<[f32; 3], OracleError>);

    impl SentimentModel for FixedModel {
        fn class_probabilities(&self, _text: &str) -> Result<[f32; 3], OracleError> {
            self.0.clone()
        }
    }

    #[test]
    fn rule_based_detects_positive_sentiment() {
        let signal = RuleBasedOracle::new()
            .analyze("Great food makes happy people")
            .expect("rule based never fails");

        assert_eq!(signal.sentiment, Sentiment::Positive);
        assert!((signal.sentiment_confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn rule_based_defaults_to_neutral_for_empty_text() {
        let signal = RuleBasedOracle::new().analyze("").expect("analysis");

        assert_eq!(signal.sentiment, Sentiment::Neutral);
        assert_eq!(signal.sentiment_confidence, 0.5);
        assert_eq!(signal.dominant_tone, DetectedTone::Polite);
        assert_eq!(signal.tone_confidence, 0.0);
    }

    #[test]
    fn tone_detection_prefers_strongest_pattern_family() {
        let (tone, confidence) =
            dominant_tone("That is wrong and ridiculous, you are never right, therefore stop.");

        assert_eq!(tone, DetectedTone::Confrontational);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn model_backed_maps_argmax_to_label() {
        let oracle = ModelBackedOracle::new(FixedModel(Ok([0.1, 0.2, 0.7])));

        let signal = oracle.analyze("Please consider this").expect("analysis");

        assert_eq!(signal.sentiment, Sentiment::Positive);
        assert!((signal.sentiment_confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(signal.dominant_tone, DetectedTone::Polite);
    }

    #[test]
    fn model_backed_rejects_out_of_range_probabilities() {
        let oracle = ModelBackedOracle::new(FixedModel(Ok([f32::NAN, 0.2, 0.7])));

        assert!(matches!(
            oracle.analyze("text"),
            Err(OracleError::Malformed(_))
        ));
    }

    #[test]
    fn model_failures_convert_to_dependency_unavailable() {
        let oracle = ModelBackedOracle::new(FixedModel(Err(OracleError::Unavailable(
            "model not loaded".to_string(),
        ))));

        let err: EngineError = oracle.analyze("text").expect_err("model down").into();

        assert!(matches!(err, EngineError::DependencyUnavailable(_)));
    }
}
