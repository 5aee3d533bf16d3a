use serde::{Deserialize, Serialize};

use super::domain::Stance;

/// How developed an argument looks from its length alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStrength {
    Weak,
    Moderate,
    Strong,
}

impl ArgumentStrength {
    pub fn from_word_count(word_count: u32) -> Self {
        if word_count > 15 {
            Self::Strong
        } else if word_count > 8 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

const AGREE_STRONG: [&str; 3] = [
    "I completely agree with your excellent points.",
    "You've made a compelling argument that I fully support.",
    "Your reasoning is sound and I'm convinced.",
];
const AGREE_MODERATE: [&str; 3] = [
    "I see your point and generally agree.",
    "You make some good arguments that I find convincing.",
    "I tend to agree with your perspective.",
];
const AGREE_WEAK: [&str; 3] = [
    "I see where you're coming from.",
    "There's some merit to your argument.",
    "I understand your point of view.",
];
const DISAGREE_STRONG: [&str; 3] = [
    "I have some concerns about your argument.",
    "I'm not fully convinced by your reasoning.",
    "I see things differently on this matter.",
];
const DISAGREE_MODERATE: [&str; 3] = [
    "I'm not sure I agree with all your points.",
    "I have a different perspective on this.",
    "I'm not entirely convinced by your argument.",
];
const DISAGREE_WEAK: [&str; 3] = [
    "I'm not sure I follow your reasoning.",
    "Could you explain your point more clearly?",
    "I need more information to understand your position.",
];
const NEUTRAL_STRONG: [&str; 3] = [
    "That's a very interesting perspective worth considering.",
    "You've raised some compelling points to think about.",
    "Your argument presents an intriguing viewpoint.",
];
const NEUTRAL_MODERATE: [&str; 3] = [
    "I see both sides of this issue.",
    "This is a complex topic with multiple viewpoints.",
    "I'm still evaluating the different perspectives.",
];
const NEUTRAL_WEAK: [&str; 3] = [
    "I need to think more about this.",
    "This is an interesting point to consider.",
    "I'm not sure what to make of this argument.",
];

/// Template-driven opponent replies. Selection is deterministic so a turn can be replayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpponentVoice;

impl OpponentVoice {
    pub fn reply(stance: Stance, word_count: u32) -> &'static str {
        let templates = match (stance, ArgumentStrength::from_word_count(word_count)) {
            (Stance::Agree, ArgumentStrength::Strong) => &AGREE_STRONG,
            (Stance::Agree, ArgumentStrength::Moderate) => &AGREE_MODERATE,
            (Stance::Agree, ArgumentStrength::Weak) => &AGREE_WEAK,
            (Stance::Disagree, ArgumentStrength::Strong) => &DISAGREE_STRONG,
            (Stance::Disagree, ArgumentStrength::Moderate) => &DISAGREE_MODERATE,
            (Stance::Disagree, ArgumentStrength::Weak) => &DISAGREE_WEAK,
            (Stance::Neutral, ArgumentStrength::Strong) => &NEUTRAL_STRONG,
            (Stance::Neutral, ArgumentStrength::Moderate) => &NEUTRAL_MODERATE,
            (Stance::Neutral, ArgumentStrength::Weak) => &NEUTRAL_WEAK,
        };
        templates[word_count as usize % templates.len()]
    }
}

/// Outcome of one dialogue turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueTurn {
    pub ai_response: String,
    pub previous_stance: Stance,
    pub new_stance: Stance,
    pub reasoning: String,
    pub score: u8,
    pub persuaded: bool,
}
