use super::domain::{Argument, TextFeatures};

/// Causal and evidential connectives that strengthen an argument.
pub const STRONG_PATTERNS: &[&str] = &[
    "because",
    "therefore",
    "consequently",
    "as a result",
    "evidence shows",
    "research indicates",
    "studies have found",
    "logically",
    "reasonably",
    "clearly",
    "obviously",
    "for example",
    "specifically",
    "in particular",
];

/// Hedging phrases that weaken an argument.
pub const WEAK_PATTERNS: &[&str] = &[
    "i think",
    "maybe",
    "perhaps",
    "possibly",
    "i guess",
    "sort of",
    "kind of",
    "i don't know",
    "probably",
    "might",
    "could be",
];

/// Topic keyword table; unknown topics match on the topic text itself.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "language learning",
        &["language", "learn", "speak", "communication", "culture"],
    ),
    (
        "education",
        &["education", "learn", "study", "knowledge", "school"],
    ),
    (
        "cultural preservation",
        &["culture", "heritage", "tradition", "preserve", "history"],
    ),
    (
        "community",
        &["community", "people", "society", "together", "group"],
    ),
];

/// Turns argument text into the counts the scorer consumes.
pub trait TextFeatureExtractor: Send + Sync {
    fn extract(&self, argument: &Argument) -> TextFeatures;
}

/// Case-insensitive substring matcher over fixed pattern lists.
#[derive(Debug, Clone, Default)]
pub struct KeywordFeatureExtractor;

impl KeywordFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    fn topic_hits(lowered: &str, topic: &str) -> u32 {
        let topic = topic.to_lowercase();
        match TOPIC_KEYWORDS.iter().find(|(name, _)| *name == topic) {
            Some((_, keywords)) => count_matches(lowered, keywords.iter().copied()),
            None => count_matches(lowered, std::iter::once(topic.as_str())),
        }
    }
}

impl TextFeatureExtractor for KeywordFeatureExtractor {
    fn extract(&self, argument: &Argument) -> TextFeatures {
        let lowered = argument.text.to_lowercase();
        let word_count = argument.text.split_whitespace().count() as u32;

        TextFeatures {
            word_count,
            strong_pattern_hits: count_matches(&lowered, STRONG_PATTERNS.iter().copied()),
            weak_pattern_hits: count_matches(&lowered, WEAK_PATTERNS.iter().copied()),
            topic_keyword_hits: argument
                .topic()
                .map(|topic| Self::topic_hits(&lowered, topic))
                .unwrap_or(0),
        }
    }
}

/// Counts how many distinct patterns occur in `haystack` (each pattern at most once).
fn count_matches<'a>(haystack: &str, patterns: impl Iterator<Item = &'a str>) -> u32 {
    patterns
        .filter(|pattern| !pattern.is_empty() && haystack.contains(pattern))
        .count() as u32
}

/// Distinct lowercase words in `text`, split on non-alphanumeric characters.
pub fn unique_words(text: &str) -> std::collections::BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::domain::TonalStyle;

    #[test]
    fn counts_strong_and_weak_patterns_once_each() {
        let argument = Argument::new(
            "Because it works, and because I think it helps, therefore maybe we should.",
            TonalStyle::Neutral,
        );

        let features = KeywordFeatureExtractor::new().extract(&argument);

        assert_eq!(features.word_count, 13);
        assert_eq!(features.strong_pattern_hits, 2);
        assert_eq!(features.weak_pattern_hits, 2);
        assert_eq!(features.topic_keyword_hits, 0);
    }

    #[test]
    fn known_topics_use_keyword_table() {
        let argument = Argument::new(
            "Learning a language lets you speak with people from another culture.",
            TonalStyle::Polite,
        )
        .with_topic("Language Learning");

        let features = KeywordFeatureExtractor::new().extract(&argument);

        // "learn" matches inside "learning"; "communication" is absent.
        assert_eq!(features.topic_keyword_hits, 4);
    }

    #[test]
    fn unknown_topics_match_on_topic_text() {
        let argument =
            Argument::new("Recycling saves resources.", TonalStyle::Neutral).with_topic("recycling");

        let features = KeywordFeatureExtractor::new().extract(&argument);

        assert_eq!(features.topic_keyword_hits, 1);
    }

    #[test]
    fn empty_text_yields_zero_counts() {
        let features = KeywordFeatureExtractor::new()
            .extract(&Argument::new("   ", TonalStyle::Formal).with_topic("education"));

        assert_eq!(features, TextFeatures::default());
    }

    #[test]
    fn unique_words_ignore_case_and_punctuation() {
        let words = unique_words("Food is good. FOOD is culture!");
        assert_eq!(words.len(), 4);
        assert!(words.contains("culture"));
    }
}
