use serde::Serialize;

use super::domain::{Stance, MAX_SCORE};
use crate::error::EngineError;

/// Score at or above which the opponent moves one step toward agreement.
pub const STRONG_ARGUMENT_SCORE: u8 = 75;

/// Score below which an agreeing opponent falls back to neutral.
pub const REASONABLE_ARGUMENT_SCORE: u8 = 50;

/// Next stance plus the opponent's explanation of the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StanceTransition {
    pub previous: Stance,
    pub next: Stance,
    pub reasoning: &'static str,
}

/// Score-gated opponent state machine. Memoryless: callers hold the stance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StanceMachine;

impl StanceMachine {
    pub fn advance(current: Stance, score: u8) -> Result<Stance, EngineError> {
        Self::transition(current, score).map(|transition| transition.next)
    }

    pub fn transition(current: Stance, score: u8) -> Result<StanceTransition, EngineError> {
        if score > MAX_SCORE {
            return Err(EngineError::validation(format!(
                "score must be at most {MAX_SCORE} (found {score})"
            )));
        }

        let (next, reasoning) = if score >= STRONG_ARGUMENT_SCORE {
            match current {
                Stance::Disagree => (
                    Stance::Neutral,
                    "The argument was quite persuasive, so I'm moving towards a more neutral stance.",
                ),
                Stance::Neutral => (
                    Stance::Agree,
                    "The argument was very persuasive, so I now agree with your point.",
                ),
                Stance::Agree => (
                    Stance::Agree,
                    "The argument was very persuasive, and I still agree with your point.",
                ),
            }
        } else if score >= REASONABLE_ARGUMENT_SCORE {
            match current {
                Stance::Disagree => (
                    Stance::Neutral,
                    "The argument had some good points, so I'm moving towards a more neutral stance.",
                ),
                other => (
                    other,
                    "The argument was reasonable but not convincing enough to change my stance.",
                ),
            }
        } else {
            match current {
                Stance::Agree => (
                    Stance::Neutral,
                    "The argument wasn't very strong, so I'm moving back to a more neutral position.",
                ),
                other => (
                    other,
                    "The argument wasn't convincing enough to change my stance.",
                ),
            }
        };

        Ok(StanceTransition {
            previous: current,
            next,
            reasoning,
        })
    }
}
