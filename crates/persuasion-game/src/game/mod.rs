//! Argument scoring, opponent stance and dialogue turns.

pub mod dialogue;
pub mod domain;
mod evaluation;
pub mod features;
pub mod router;
pub mod sentiment;
pub mod service;
pub mod stance;
pub mod transcript;

#[cfg(test)]
mod tests;

pub use dialogue::{ArgumentStrength, DialogueTurn, OpponentVoice};
pub use domain::{
    Argument, DetectedTone, Evaluation, ScoreComponent, ScoreFactor, Sentiment, SentimentSignal,
    Stance, TextFeatures, TonalStyle, MAX_SCORE, PERSUASION_THRESHOLD,
};
pub use evaluation::ArgumentScorer;
pub use features::{unique_words, KeywordFeatureExtractor, TextFeatureExtractor};
pub use router::game_router;
pub use sentiment::{
    ModelBackedOracle, OracleError, RuleBasedOracle, SentimentModel, SentimentOracle,
};
pub use service::GameService;
pub use stance::{StanceMachine, StanceTransition};
pub use transcript::{TranscriptImportError, TranscriptImporter};
