use std::sync::Arc;

use tracing::{debug, warn};

use super::dialogue::{DialogueTurn, OpponentVoice};
use super::domain::{Argument, Evaluation, SentimentSignal, Stance, TextFeatures};
use super::evaluation::ArgumentScorer;
use super::features::TextFeatureExtractor;
use super::sentiment::{OracleError, SentimentOracle};
use super::stance::StanceMachine;
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Service composing feature extraction, sentiment analysis and scoring.
pub struct GameService<O, X> {
    oracle: Arc<O>,
    extractor: Arc<X>,
    scorer: ArgumentScorer,
}

impl<O, X> GameService<O, X>
where
    O: SentimentOracle + 'static,
    X: TextFeatureExtractor + 'static,
{
    pub fn new(oracle: Arc<O>, extractor: Arc<X>, config: EngineConfig) -> Self {
        Self {
            oracle,
            extractor,
            scorer: ArgumentScorer::new(config),
        }
    }

    /// Score an argument, falling back to a sentiment-free score when the oracle fails.
    pub fn evaluate(&self, argument: &Argument) -> Result<Evaluation, EngineError> {
        self.evaluate_with_features(argument)
            .map(|(evaluation, _)| evaluation)
    }

    fn evaluate_with_features(
        &self,
        argument: &Argument,
    ) -> Result<(Evaluation, TextFeatures), EngineError> {
        let features = self.extractor.extract(argument);
        let sentiment = match self.analyze_sentiment(&argument.text) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!(error = %err, "sentiment oracle failed; scoring without sentiment");
                None
            }
        };

        let evaluation = self
            .scorer
            .evaluate(argument, &features, sentiment.as_ref())?;
        debug!(
            score = evaluation.score,
            persuaded = evaluation.persuaded,
            words = features.word_count,
            "argument evaluated"
        );
        Ok((evaluation, features))
    }

    // Out-of-range output is the oracle's fault, not the player's.
    fn analyze_sentiment(&self, text: &str) -> Result<SentimentSignal, OracleError> {
        let signal = self.oracle.analyze(text)?;
        signal
            .validate()
            .map_err(|err| OracleError::Malformed(err.to_string()))?;
        Ok(signal)
    }

    /// Score the player's turn and move the opponent accordingly.
    pub fn advance_dialogue(
        &self,
        scenario: &str,
        argument: &Argument,
        current: Stance,
    ) -> Result<DialogueTurn, EngineError> {
        if scenario.trim().is_empty() {
            return Err(EngineError::validation("scenario must not be blank"));
        }

        let (evaluation, features) = self.evaluate_with_features(argument)?;
        let transition = StanceMachine::transition(current, evaluation.score)?;

        debug!(
            scenario,
            from = %current,
            to = %transition.next,
            score = evaluation.score,
            "dialogue turn resolved"
        );

        Ok(DialogueTurn {
            ai_response: OpponentVoice::reply(transition.next, features.word_count).to_string(),
            previous_stance: current,
            new_stance: transition.next,
            reasoning: transition.reasoning.to_string(),
            score: evaluation.score,
            persuaded: evaluation.persuaded,
        })
    }

    /// Score every argument independently; one failure does not stop the batch.
    pub fn evaluate_batch(&self, arguments: &[Argument]) -> Vec<Result<Evaluation, EngineError>> {
        arguments
            .iter()
            .map(|argument| self.evaluate(argument))
            .collect()
    }
}
