use super::super::domain::{
    Argument, ScoreComponent, ScoreFactor, Sentiment, SentimentSignal, TextFeatures, TonalStyle,
};

pub(crate) const BASE_SCORE: f32 = 50.0;

const LENGTH_TARGET_WORDS: f32 = 20.0;
const LENGTH_MAX_POINTS: f32 = 20.0;
const TOPIC_MAX_POINTS: f32 = 30.0;
const TOPIC_DENSITY_SCALE: f32 = 10.0;
const STRONG_PATTERN_POINTS: f32 = 3.0;
const WEAK_PATTERN_POINTS: f32 = -2.0;
const SENTIMENT_CONFIDENCE_FLOOR: f32 = 0.6;
const POSITIVE_SENTIMENT_POINTS: f32 = 5.0;
const NEGATIVE_SENTIMENT_POINTS: f32 = -3.0;

pub(crate) fn tone_impact(tone: TonalStyle) -> f32 {
    match tone {
        TonalStyle::Polite => 5.0,
        TonalStyle::Passionate => 10.0,
        TonalStyle::Formal => 8.0,
        TonalStyle::Casual => -2.0,
        TonalStyle::Confrontational => -5.0,
        TonalStyle::Neutral => 0.0,
    }
}

/// Applies every adjustment and returns the components plus the unclamped total.
pub(crate) fn score_argument(
    argument: &Argument,
    features: &TextFeatures,
    sentiment: Option<&SentimentSignal>,
) -> (Vec<ScoreComponent>, f32) {
    let mut components = Vec::with_capacity(5);
    let mut total = BASE_SCORE;

    let length = (features.word_count as f32 / LENGTH_TARGET_WORDS).min(1.0) * LENGTH_MAX_POINTS;
    components.push(ScoreComponent {
        factor: ScoreFactor::Length,
        points: length,
        notes: format!("{} word(s)", features.word_count),
    });
    total += length;

    if let Some(topic) = argument.topic() {
        let relevance = if features.word_count == 0 {
            0.0
        } else {
            (features.topic_keyword_hits as f32 / features.word_count as f32
                * TOPIC_DENSITY_SCALE)
                .min(1.0)
        };
        let points = relevance * TOPIC_MAX_POINTS;
        components.push(ScoreComponent {
            factor: ScoreFactor::TopicRelevance,
            points,
            notes: format!(
                "{} keyword hit(s) for '{}' (relevance {:.2})",
                features.topic_keyword_hits, topic, relevance
            ),
        });
        total += points;
    }

    let tone = tone_impact(argument.declared_tone);
    components.push(ScoreComponent {
        factor: ScoreFactor::DeclaredTone,
        points: tone,
        notes: format!("declared tone {}", argument.declared_tone.label()),
    });
    total += tone;

    let patterns = features.strong_pattern_hits as f32 * STRONG_PATTERN_POINTS
        + features.weak_pattern_hits as f32 * WEAK_PATTERN_POINTS;
    components.push(ScoreComponent {
        factor: ScoreFactor::Patterns,
        points: patterns,
        notes: format!(
            "{} strong connective(s), {} hedge(s)",
            features.strong_pattern_hits, features.weak_pattern_hits
        ),
    });
    total += patterns;

    let (points, notes) = sentiment_adjustment(sentiment);
    components.push(ScoreComponent {
        factor: ScoreFactor::Sentiment,
        points,
        notes,
    });
    total += points;

    (components, total)
}

fn sentiment_adjustment(sentiment: Option<&SentimentSignal>) -> (f32, String) {
    let Some(signal) = sentiment else {
        return (0.0, "sentiment unavailable".to_string());
    };

    let confident = signal.sentiment_confidence > SENTIMENT_CONFIDENCE_FLOOR;
    match signal.sentiment {
        Sentiment::Positive if confident => (
            POSITIVE_SENTIMENT_POINTS,
            format!(
                "positive sentiment ({:.2} confidence)",
                signal.sentiment_confidence
            ),
        ),
        Sentiment::Negative if confident => (
            NEGATIVE_SENTIMENT_POINTS,
            format!(
                "negative sentiment ({:.2} confidence)",
                signal.sentiment_confidence
            ),
        ),
        _ => (0.0, "no confident sentiment".to_string()),
    }
}

/// Clamp to the score scale and drop the fractional part.
pub(crate) fn clamp_score(total: f32) -> u8 {
    total.clamp(0.0, 100.0).trunc() as u8
}
