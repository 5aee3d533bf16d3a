use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use persuasion_game::config::EngineConfig;
use persuasion_game::error::AppError;
use persuasion_game::game::{GameService, KeywordFeatureExtractor, RuleBasedOracle};
use persuasion_game::progression::{
    Badge, BadgeEvaluator, ProgressionRepository, RepositoryError, StreakRecord, UserId, XpGrant,
};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) type DefaultGameService = GameService<RuleBasedOracle, KeywordFeatureExtractor>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local storage; progress is lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProgressionRepository {
    streaks: Arc<Mutex<HashMap<UserId, StreakRecord>>>,
    grants: Arc<Mutex<HashMap<UserId, Vec<XpGrant>>>>,
    badges: Arc<Mutex<HashMap<UserId, Vec<Badge>>>>,
}

impl ProgressionRepository for InMemoryProgressionRepository {
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
        if guard.contains_key(&record.user_id) {
            guard.insert(record.user_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_streak(&self, user_id: &UserId) -> Result<Option<StreakRecord>, RepositoryError> {
        let guard = self.streaks.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn append_grant(&self, grant: XpGrant) -> Result<(), RepositoryError> {
        let mut guard = self.grants.lock().expect("repository mutex poisoned");
        guard.entry(grant.user_id.clone()).or_default().push(grant);
        Ok(())
    }

    fn grants(&self, user_id: &UserId) -> Result<Vec<XpGrant>, RepositoryError> {
        let guard = self.grants.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    fn insert_badge(&self, badge: Badge) -> Result<Badge, RepositoryError> {
        let mut guard = self.badges.lock().expect("repository mutex poisoned");
        let held = guard.entry(badge.user_id.clone()).or_default();
        if held.iter().any(|stored| stored.badge_id == badge.badge_id) {
            return Err(RepositoryError::Conflict);
        }
        held.push(badge.clone());
        Ok(badge)
    }

    fn update_badge(&self, badge: Badge) -> Result<(), RepositoryError> {
        let mut guard = self.badges.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&badge.user_id)
            .and_then(|held| held.iter_mut().find(|stored| stored.badge_id == badge.badge_id))
            .ok_or(RepositoryError::NotFound)?;
        *stored = badge;
        Ok(())
    }

    fn badges(&self, user_id: &UserId) -> Result<Vec<Badge>, RepositoryError> {
        let guard = self.badges.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }
}

pub(crate) fn default_game_service(config: EngineConfig) -> DefaultGameService {
    GameService::new(
        Arc::new(RuleBasedOracle::new()),
        Arc::new(KeywordFeatureExtractor::new()),
        config,
    )
}

pub(crate) fn load_badge_catalog(path: Option<&Path>) -> Result<BadgeEvaluator, AppError> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(BadgeEvaluator::from_json_reader(file)?)
        }
        None => Ok(BadgeEvaluator::standard()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use persuasion_game::progression::BadgeId;

    fn badge(id: &str, user: &str) -> Badge {
        Badge {
            badge_id: BadgeId(id.to_string()),
            user_id: UserId(user.to_string()),
            badge_type: "first_win".to_string(),
            name: "First Victory".to_string(),
            description: String::new(),
            earned_at: Utc
                .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
            active: true,
        }
    }

    #[test]
    fn update_streak_requires_existing_record() {
        let repository = InMemoryProgressionRepository::default();
        let today = parse_date("2025-03-01").expect("date");
        let record = StreakRecord::new(UserId("esi".to_string()), today);

        assert!(matches!(
            repository.update_streak(record.clone()),
            Err(RepositoryError::NotFound)
        ));
        repository.insert_streak(record.clone()).expect("insert");
        repository.update_streak(record).expect("update");
    }

    #[test]
    fn badges_are_partitioned_by_user() {
        let repository = InMemoryProgressionRepository::default();
        repository.insert_badge(badge("badge-1", "esi")).expect("insert");
        repository.insert_badge(badge("badge-2", "kojo")).expect("insert");

        let mut revoked = badge("badge-1", "esi");
        revoked.active = false;
        repository.update_badge(revoked).expect("update");

        let esi = repository.badges(&UserId("esi".to_string())).expect("list");
        assert_eq!(esi.len(), 1);
        assert!(!esi[0].active);
        assert!(matches!(
            repository.insert_badge(badge("badge-2", "kojo")),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert!(parse_date(" 2025-03-01 ").is_ok());
        assert!(parse_date("03/01/2025").is_err());
    }
}
