mod feedback;
mod rules;

use super::domain::{Argument, Evaluation, SentimentSignal, TextFeatures, PERSUASION_THRESHOLD};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Stateless scorer turning features and signals into an [`Evaluation`].
#[derive(Debug, Clone, Default)]
pub struct ArgumentScorer {
    config: EngineConfig,
}

impl ArgumentScorer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Score an argument. A missing `sentiment` contributes nothing and marks
    /// the evaluation as degraded.
    pub fn evaluate(
        &self,
        argument: &Argument,
        features: &TextFeatures,
        sentiment: Option<&SentimentSignal>,
    ) -> Result<Evaluation, EngineError> {
        let length = argument.text.chars().count();
        if length > self.config.max_argument_chars {
            return Err(EngineError::validation(format!(
                "argument is {length} characters, limit is {}",
                self.config.max_argument_chars
            )));
        }
        if let Some(signal) = sentiment {
            signal.validate()?;
        }

        let (components, total) = rules::score_argument(argument, features, sentiment);
        let score = rules::clamp_score(total);

        Ok(Evaluation {
            score,
            persuaded: score >= PERSUASION_THRESHOLD,
            feedback: feedback::feedback_for(score, argument.declared_tone),
            components,
            detected_tone: sentiment.map(|signal| signal.dominant_tone),
            sentiment_degraded: sentiment.is_none(),
        })
    }
}

