use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Score at or above which a single argument counts as persuasive.
pub const PERSUASION_THRESHOLD: u8 = 70;

/// Upper bound of the persuasiveness scale.
pub const MAX_SCORE: u8 = 100;

/// Tone the player declares for an argument before submitting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TonalStyle {
    Polite,
    Passionate,
    Formal,
    Casual,
    Confrontational,
    #[serde(other)]
    Neutral,
}

impl TonalStyle {
    /// Lenient parse: anything unrecognised is treated as a neutral tone.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "polite" => Self::Polite,
            "passionate" => Self::Passionate,
            "formal" => Self::Formal,
            "casual" => Self::Casual,
            "confrontational" => Self::Confrontational,
            _ => Self::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TonalStyle::Polite => "polite",
            TonalStyle::Passionate => "passionate",
            TonalStyle::Formal => "formal",
            TonalStyle::Casual => "casual",
            TonalStyle::Confrontational => "confrontational",
            TonalStyle::Neutral => "neutral",
        }
    }
}

impl Default for TonalStyle {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Immutable player submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub text: String,
    #[serde(default)]
    pub declared_tone: TonalStyle,
    #[serde(default)]
    pub topic: Option<String>,
}

impl Argument {
    pub fn new(text: impl Into<String>, declared_tone: TonalStyle) -> Self {
        Self {
            text: text.into(),
            declared_tone,
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Topic with surrounding whitespace removed; blank topics count as absent.
    pub fn topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
    }
}

/// Surface counts extracted from the argument text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub word_count: u32,
    pub strong_pattern_hits: u32,
    pub weak_pattern_hits: u32,
    pub topic_keyword_hits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Tone detected in the text by the sentiment oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedTone {
    Polite,
    Passionate,
    Formal,
    Casual,
    Confrontational,
}

impl DetectedTone {
    pub const ALL: [DetectedTone; 5] = [
        DetectedTone::Polite,
        DetectedTone::Passionate,
        DetectedTone::Formal,
        DetectedTone::Casual,
        DetectedTone::Confrontational,
    ];
}

/// Analyzer output consumed by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub sentiment: Sentiment,
    pub sentiment_confidence: f32,
    pub dominant_tone: DetectedTone,
    pub tone_confidence: f32,
}

impl SentimentSignal {
    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("sentiment_confidence", self.sentiment_confidence),
            ("tone_confidence", self.tone_confidence),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EngineError::validation(format!(
                    "{name} must lie within [0, 1] (found {value})"
                )));
            }
        }
        Ok(())
    }
}

/// Named adjustment applied on top of the base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Length,
    TopicRelevance,
    DeclaredTone,
    Patterns,
    Sentiment,
}

/// Discrete contribution to an evaluation, kept for transparent feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f32,
    pub notes: String,
}

/// Result of scoring one argument. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub persuaded: bool,
    pub feedback: Vec<String>,
    pub components: Vec<ScoreComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_tone: Option<DetectedTone>,
    #[serde(default)]
    pub sentiment_degraded: bool,
}

impl Evaluation {
    pub fn feedback_text(&self) -> String {
        self.feedback.join(" ")
    }
}

/// Position of the simulated opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Disagree,
    Neutral,
    Agree,
}

impl Stance {
    pub fn label(self) -> &'static str {
        match self {
            Stance::Disagree => "disagree",
            Stance::Neutral => "neutral",
            Stance::Agree => "agree",
        }
    }
}

impl Default for Stance {
    fn default() -> Self {
        Self::Disagree
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stance {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disagree" => Ok(Stance::Disagree),
            "neutral" => Ok(Stance::Neutral),
            "agree" => Ok(Stance::Agree),
            other => Err(EngineError::validation(format!(
                "stance must be one of disagree, neutral, agree (found '{other}')"
            ))),
        }
    }
}
