use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Identifier wrapper for players (the nickname in the game UI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngineError::validation("user id must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consecutive-day activity record; one per user, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub user_id: UserId,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: NaiveDate,
}

impl StreakRecord {
    pub fn new(user_id: UserId, today: NaiveDate) -> Self {
        Self {
            user_id,
            current_streak: 1,
            longest_streak: 1,
            last_activity_date: today,
        }
    }

    /// Inconsistent records are programmer errors, not recoverable input.
    pub(crate) fn debug_assert_consistent(&self) {
        debug_assert!(
            self.current_streak >= 1,
            "streak for {} dropped below 1",
            self.user_id
        );
        debug_assert!(
            self.longest_streak >= self.current_streak,
            "longest streak {} below current {} for {}",
            self.longest_streak,
            self.current_streak,
            self.user_id
        );
    }
}

/// Append-only experience grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpGrant {
    pub user_id: UserId,
    pub base_amount: u32,
    pub multiplier: f64,
    pub final_amount: u64,
    pub activity_type: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BadgeId(pub String);

/// Achievement issued at most once (while active) per user and badge type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub badge_id: BadgeId,
    pub user_id: UserId,
    pub badge_type: String,
    pub name: String,
    pub description: String,
    pub earned_at: DateTime<Utc>,
    pub active: bool,
}

/// Outcome of one finished game, reported by the caller for badge checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub rounds_played: u32,
    pub rounds_won: u32,
    pub best_score: u8,
    pub unique_words: u32,
    #[serde(default)]
    pub completed: bool,
}

impl GameSummary {
    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if self.rounds_won > self.rounds_played {
            return Err(EngineError::validation(format!(
                "rounds won ({}) exceed rounds played ({})",
                self.rounds_won, self.rounds_played
            )));
        }
        if self.best_score > crate::game::MAX_SCORE {
            return Err(EngineError::validation(format!(
                "best score must be at most {} (found {})",
                crate::game::MAX_SCORE,
                self.best_score
            )));
        }
        Ok(())
    }

    /// Every round of a completed game was won.
    pub fn is_perfect(&self) -> bool {
        self.completed && self.rounds_played > 0 && self.rounds_won == self.rounds_played
    }
}

/// Values the badge rules are checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_xp: u64,
    pub rounds_won: u32,
    pub best_score: u8,
    pub unique_words: u32,
    pub perfect_games: u32,
}

impl PlayerStats {
    pub fn from_parts(streak: &StreakRecord, total_xp: u64, game: &GameSummary) -> Self {
        Self {
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            total_xp,
            rounds_won: game.rounds_won,
            best_score: game.best_score,
            unique_words: game.unique_words,
            perfect_games: u32::from(game.is_perfect()),
        }
    }
}
