use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::progression::domain::{Badge, StreakRecord, UserId, XpGrant};
use crate::progression::repository::{ProgressionRepository, RepositoryError};
use crate::progression::{FixedClock, ProgressionService};

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
}

pub(super) fn at(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, d, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn user(name: &str) -> UserId {
    UserId(name.to_string())
}

/// Clock pinned to 2025-03-01 at noon; tests move it with `clock.set(at(..))`.
pub(super) fn start_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(at(1, 12)))
}

pub(super) fn build_service() -> (
    ProgressionService<MemoryRepository>,
    Arc<MemoryRepository>,
    Arc<FixedClock>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let clock = start_clock();
    let service = ProgressionService::new(repository.clone()).with_clock(clock.clone());
    (service, repository, clock)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) streaks: Arc<Mutex<HashMap<UserId, StreakRecord>>>,
    pub(super) grants: Arc<Mutex<Vec<XpGrant>>>,
    pub(super) badges: Arc<Mutex<Vec<Badge>>>,
}

impl ProgressionRepository for MemoryRepository {
    fn insert_streak(&self, record: StreakRecord) -> Result<StreakRecord, RepositoryError> {
        let mut guard = self.streaks.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.user_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    fn update_streak(&self, record: StreakRecord) -> Result<(), RepositoryError> {
        let mut guard = self.streaks.lock().expect("repository mutex poisoned");
        guard.insert(record.user_id.clone(), record);
        Ok(())
    }

    fn fetch_streak(&self, user_id: &UserId) -> Result<Option<StreakRecord>, RepositoryError> {
        let guard = self.streaks.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn append_grant(&self, grant: XpGrant) -> Result<(), RepositoryError> {
        self.grants
            .lock()
            .expect("repository mutex poisoned")
            .push(grant);
        Ok(())
    }

    fn grants(&self, user_id: &UserId) -> Result<Vec<XpGrant>, RepositoryError> {
        let guard = self.grants.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|grant| &grant.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_badge(&self, badge: Badge) -> Result<Badge, RepositoryError> {
        self.badges
            .lock()
            .expect("repository mutex poisoned")
            .push(badge.clone());
        Ok(badge)
    }

    fn update_badge(&self, badge: Badge) -> Result<(), RepositoryError> {
        let mut guard = self.badges.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|stored| stored.badge_id == badge.badge_id) {
            Some(stored) => {
                *stored = badge;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn badges(&self, user_id: &UserId) -> Result<Vec<Badge>, RepositoryError> {
        let guard = self.badges.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|badge| &badge.user_id == user_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ProgressionRepository for UnavailableRepository {
    fn insert_streak(&self, _record: StreakRecord) -> Result<StreakRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_streak(&self, _record: StreakRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_streak(&self, _user_id: &UserId) -> Result<Option<StreakRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_grant(&self, _grant: XpGrant) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn grants(&self, _user_id: &UserId) -> Result<Vec<XpGrant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_badge(&self, _badge: Badge) -> Result<Badge, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_badge(&self, _badge: Badge) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn badges(&self, _user_id: &UserId) -> Result<Vec<Badge>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
