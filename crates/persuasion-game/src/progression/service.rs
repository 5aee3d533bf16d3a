use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::badges::{next_badge_id, BadgeEvaluator};
use super::clock::{Clock, SystemClock};
use super::domain::{Badge, GameSummary, PlayerStats, StreakRecord, UserId, XpGrant};
use super::repository::{ProgressionRepository, RepositoryError};
use super::streak::{multiplier_for, StreakStatus, StreakTracker};
use super::xp::{LevelProgress, XpLedger};
use crate::error::EngineError;

/// Result of a single XP grant, with the streak context it was computed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpAward {
    pub grant: XpGrant,
    pub current_streak: u32,
    pub xp_multiplier: f64,
    pub level: u32,
    pub leveled_up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeAward {
    pub awarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

/// One mutex per user; serializes read-modify-write cycles against the repository.
/// Entries are dropped once no caller holds or waits on them.
#[derive(Debug, Default)]
struct UserLocks {
    inner: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    fn with_user<T>(
        &self,
        user_id: &UserId,
        work: impl FnOnce() -> Result<T, ProgressionServiceError>,
    ) -> Result<T, ProgressionServiceError> {
        let handle = {
            let mut registry = self.registry();
            registry.entry(user_id.clone()).or_default().clone()
        };

        let result = {
            let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);
            work()
        };

        // Handles are only cloned under the registry lock, so two owners means
        // the registry and this call.
        let mut registry = self.registry();
        if Arc::strong_count(&handle) == 2 {
            registry.remove(user_id);
        }
        result
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<UserId, Arc<Mutex<()>>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.registry().len()
    }
}

/// Service composing streaks, the XP ledger and badge rules over a repository.
/// Every date and timestamp comes from the injected [`Clock`].
pub struct ProgressionService<R> {
    repository: Arc<R>,
    badges: Arc<BadgeEvaluator>,
    clock: Arc<dyn Clock>,
    locks: UserLocks,
}

impl<R> ProgressionService<R>
where
    R: ProgressionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_badges(repository, BadgeEvaluator::standard())
    }

    pub fn with_badges(repository: Arc<R>, badges: BadgeEvaluator) -> Self {
        Self {
            repository,
            badges: Arc::new(badges),
            clock: Arc::new(SystemClock),
            locks: UserLocks::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the streak record for a new player.
    pub fn register_user(&self, user_id: &UserId) -> Result<StreakStatus, ProgressionServiceError> {
        let today = self.clock.today();
        self.locks.with_user(user_id, || {
            let record = self
                .repository
                .insert_streak(StreakRecord::new(user_id.clone(), today))?;
            info!(user = %user_id, "registered player");
            Ok(StreakStatus::from(&record))
        })
    }

    pub fn streak(&self, user_id: &UserId) -> Result<StreakStatus, ProgressionServiceError> {
        let record = self.require_streak(user_id)?;
        Ok(StreakStatus::from(&record))
    }

    /// Record qualifying activity today. The first touch for an unknown player creates the record.
    pub fn touch_streak(&self, user_id: &UserId) -> Result<StreakStatus, ProgressionServiceError> {
        let today = self.clock.today();
        self.locks.with_user(user_id, || {
            let record = self.touch_locked(user_id, today)?;
            Ok(StreakStatus::from(&record))
        })
    }

    pub fn reset_streak(&self, user_id: &UserId) -> Result<StreakStatus, ProgressionServiceError> {
        let today = self.clock.today();
        self.locks.with_user(user_id, || {
            let current = self.require_streak(user_id)?;
            let reset = StreakTracker::reset(&current, today);
            self.repository.update_streak(reset.clone())?;
            info!(
                user = %user_id,
                previous_streak = current.current_streak,
                "streak reset"
            );
            Ok(StreakStatus::from(&reset))
        })
    }

    /// Grant XP for an activity. The activity also counts toward the streak, and
    /// the multiplier comes from the streak after that touch.
    pub fn grant_xp(
        &self,
        user_id: &UserId,
        base_amount: u32,
        activity_type: &str,
    ) -> Result<XpAward, ProgressionServiceError> {
        // Reject before the streak is touched so a bad grant records no activity.
        if activity_type.trim().is_empty() {
            return Err(EngineError::validation("activity type must not be blank").into());
        }

        let now = self.clock.now();
        self.locks.with_user(user_id, || {
            let previous_total = XpLedger::total(&self.repository.grants(user_id)?);
            let streak = self.touch_locked(user_id, now.date_naive())?;
            let xp_multiplier = multiplier_for(streak.current_streak);

            let grant = XpLedger::grant(user_id, base_amount, activity_type, xp_multiplier, now)?;
            self.repository.append_grant(grant.clone())?;

            let previous_level = XpLedger::level_for(previous_total);
            let level = XpLedger::level_for(previous_total.saturating_add(grant.final_amount));
            info!(
                user = %user_id,
                activity = %grant.activity_type,
                final_amount = grant.final_amount,
                multiplier = xp_multiplier,
                level,
                "xp granted"
            );
            let leveled_up = level > previous_level;
            if leveled_up {
                info!(user = %user_id, from = previous_level, to = level, "level up");
            }

            Ok(XpAward {
                grant,
                current_streak: streak.current_streak,
                xp_multiplier,
                level,
                leveled_up,
            })
        })
    }

    pub fn level(&self, user_id: &UserId) -> Result<LevelProgress, ProgressionServiceError> {
        self.require_streak(user_id)?;
        let total = XpLedger::total(&self.repository.grants(user_id)?);
        Ok(XpLedger::level_progress(total))
    }

    /// Manually issue a badge. Returns `awarded = false` when an active badge of the type exists.
    pub fn award_badge(
        &self,
        user_id: &UserId,
        badge_type: &str,
    ) -> Result<BadgeAward, ProgressionServiceError> {
        let badge_type = badge_type_arg(badge_type)?;
        let now = self.clock.now();

        self.locks.with_user(user_id, || {
            self.require_streak(user_id)?;
            let existing = self.repository.badges(user_id)?;
            if existing
                .iter()
                .any(|badge| badge.active && badge.badge_type == badge_type)
            {
                return Ok(BadgeAward {
                    awarded: false,
                    badge: None,
                });
            }

            let (name, description) = match self.badges.rule(badge_type) {
                Some(rule) => (rule.name.clone(), rule.description.clone()),
                None => (badge_type.replace('_', " "), String::new()),
            };
            let badge = self.repository.insert_badge(Badge {
                badge_id: next_badge_id(),
                user_id: user_id.clone(),
                badge_type: badge_type.to_string(),
                name,
                description,
                earned_at: now,
                active: true,
            })?;
            info!(user = %user_id, badge = %badge.badge_type, "badge awarded");

            Ok(BadgeAward {
                awarded: true,
                badge: Some(badge),
            })
        })
    }

    /// Run the badge catalog against the player's stats and the game just finished.
    pub fn check_badges(
        &self,
        user_id: &UserId,
        game: &GameSummary,
    ) -> Result<Vec<Badge>, ProgressionServiceError> {
        game.validate()?;
        let now = self.clock.now();

        self.locks.with_user(user_id, || {
            let streak = self.require_streak(user_id)?;
            let total_xp = XpLedger::total(&self.repository.grants(user_id)?);
            let stats = PlayerStats::from_parts(&streak, total_xp, game);
            let existing = self.repository.badges(user_id)?;

            let mut awarded = Vec::new();
            for badge in self.badges.check_and_award(user_id, &stats, &existing, now) {
                awarded.push(self.repository.insert_badge(badge)?);
            }
            if !awarded.is_empty() {
                info!(user = %user_id, count = awarded.len(), "badges unlocked");
            }
            Ok(awarded)
        })
    }

    pub fn badges(&self, user_id: &UserId) -> Result<Vec<Badge>, ProgressionServiceError> {
        self.require_streak(user_id)?;
        Ok(self.repository.badges(user_id)?)
    }

    /// Deactivate the active badge of `badge_type`; it may be earned again later.
    pub fn revoke_badge(
        &self,
        user_id: &UserId,
        badge_type: &str,
    ) -> Result<Badge, ProgressionServiceError> {
        let badge_type = badge_type_arg(badge_type)?;

        self.locks.with_user(user_id, || {
            self.require_streak(user_id)?;
            let mut badge = self
                .repository
                .badges(user_id)?
                .into_iter()
                .find(|badge| badge.active && badge.badge_type == badge_type)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "badge",
                    id: badge_type.to_string(),
                })?;

            badge.active = false;
            self.repository.update_badge(badge.clone())?;
            info!(user = %user_id, badge = %badge_type, "badge revoked");
            Ok(badge)
        })
    }

    fn require_streak(&self, user_id: &UserId) -> Result<StreakRecord, ProgressionServiceError> {
        self.repository
            .fetch_streak(user_id)?
            .ok_or_else(|| {
                EngineError::NotFound {
                    entity: "user",
                    id: user_id.to_string(),
                }
                .into()
            })
    }

    // Caller holds the user's lock.
    fn touch_locked(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> Result<StreakRecord, ProgressionServiceError> {
        match self.repository.fetch_streak(user_id)? {
            Some(current) => {
                let next = StreakTracker::touch(&current, today)?;
                if next != current {
                    self.repository.update_streak(next.clone())?;
                }
                Ok(next)
            }
            None => {
                let record = self
                    .repository
                    .insert_streak(StreakRecord::new(user_id.clone(), today))?;
                info!(user = %user_id, "streak started");
                Ok(record)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks.len()
    }
}

fn badge_type_arg(raw: &str) -> Result<&str, EngineError> {
    let badge_type = raw.trim();
    if badge_type.is_empty() {
        return Err(EngineError::validation("badge type must not be blank"));
    }
    Ok(badge_type)
}

/// Error raised by the progression service.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
