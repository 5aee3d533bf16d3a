use chrono::NaiveDate;
use serde::Serialize;

use super::domain::StreakRecord;
use crate::error::EngineError;

/// XP multiplier earned by keeping a daily streak alive.
pub fn multiplier_for(current_streak: u32) -> f64 {
    match current_streak {
        30.. => 2.0,
        14..=29 => 1.5,
        7..=13 => 1.25,
        _ => 1.0,
    }
}

/// Streak snapshot returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakStatus {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: NaiveDate,
    /// `None` only at the end of the calendar range.
    pub next_activity_due: Option<NaiveDate>,
    pub xp_multiplier: f64,
}

impl From<&StreakRecord> for StreakStatus {
    fn from(record: &StreakRecord) -> Self {
        Self {
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
            last_activity_date: record.last_activity_date,
            next_activity_due: record.last_activity_date.succ_opt(),
            xp_multiplier: multiplier_for(record.current_streak),
        }
    }
}

/// Calendar-day streak rules. Operates on snapshots; callers persist the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakTracker;

impl StreakTracker {
    /// Register qualifying activity on `today`.
    pub fn touch(record: &StreakRecord, today: NaiveDate) -> Result<StreakRecord, EngineError> {
        record.debug_assert_consistent();

        let days_since = (today - record.last_activity_date).num_days();
        if days_since < 0 {
            return Err(EngineError::validation(format!(
                "last activity {} for {} is after {}",
                record.last_activity_date, record.user_id, today
            )));
        }

        let mut next = record.clone();
        match days_since {
            0 => return Ok(next),
            1 => {
                next.current_streak += 1;
                next.longest_streak = next.longest_streak.max(next.current_streak);
            }
            _ => next.current_streak = 1,
        }
        next.last_activity_date = today;

        next.debug_assert_consistent();
        Ok(next)
    }

    /// Administrative or forfeit reset, independent of dates. Longest streak is kept.
    pub fn reset(record: &StreakRecord, today: NaiveDate) -> StreakRecord {
        record.debug_assert_consistent();
        StreakRecord {
            current_streak: 1,
            last_activity_date: today.max(record.last_activity_date),
            ..record.clone()
        }
    }
}
