use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{UserId, XpGrant};
use crate::error::EngineError;

/// XP needed to leave level 1; each later level costs `LEVEL_STEP * level` more.
pub const LEVEL_STEP: u64 = 1000;

/// Where a player sits on the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    pub total_xp: u64,
    pub level_floor: u64,
    pub next_level_at: u64,
}

/// Issues XP grants and derives levels from cumulative XP.
#[derive(Debug, Clone, Copy, Default)]
pub struct XpLedger;

impl XpLedger {
    pub fn grant(
        user_id: &UserId,
        base_amount: u32,
        activity_type: &str,
        multiplier: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<XpGrant, EngineError> {
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(EngineError::validation(format!(
                "xp multiplier must be at least 1.0 (found {multiplier})"
            )));
        }
        let activity_type = activity_type.trim();
        if activity_type.is_empty() {
            return Err(EngineError::validation("activity type must not be blank"));
        }

        Ok(XpGrant {
            user_id: user_id.clone(),
            base_amount,
            multiplier,
            final_amount: (f64::from(base_amount) * multiplier).round() as u64,
            activity_type: activity_type.to_string(),
            timestamp,
        })
    }

    pub fn total(grants: &[XpGrant]) -> u64 {
        grants
            .iter()
            .fold(0u64, |total, grant| total.saturating_add(grant.final_amount))
    }

    /// Level thresholds: 1000, 3000, 6000, 10000, ...
    pub fn level_for(total_xp: u64) -> u32 {
        Self::level_progress(total_xp).level
    }

    pub fn level_progress(total_xp: u64) -> LevelProgress {
        let mut level: u32 = 1;
        let mut floor: u64 = 0;
        let mut required: u64 = LEVEL_STEP;

        while total_xp >= required {
            let Some(next) = required.checked_add(LEVEL_STEP * u64::from(level + 1)) else {
                break;
            };
            level += 1;
            floor = required;
            required = next;
        }

        LevelProgress {
            level,
            total_xp,
            level_floor: floor,
            next_level_at: required,
        }
    }
}
