//! Player progression: daily streaks, XP and levels, and badges.
//!
//! The rule types (`StreakTracker`, `XpLedger`, `BadgeEvaluator`) are pure and
//! operate on snapshots. `ProgressionService` owns persistence and serializes
//! updates per player.

pub mod badges;
pub mod clock;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod streak;
pub mod xp;

#[cfg(test)]
mod tests;

pub use badges::{BadgeEvaluator, BadgeMetric, BadgeRule};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{Badge, BadgeId, GameSummary, PlayerStats, StreakRecord, UserId, XpGrant};
pub use repository::{ProgressionRepository, RepositoryError};
pub use router::progression_router;
pub use service::{BadgeAward, ProgressionService, ProgressionServiceError, XpAward};
pub use streak::{multiplier_for, StreakStatus, StreakTracker};
pub use xp::{LevelProgress, XpLedger, LEVEL_STEP};
