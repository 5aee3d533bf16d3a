use std::collections::HashSet;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Badge, BadgeId, PlayerStats, UserId};
use crate::error::EngineError;

/// Statistic a badge rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeMetric {
    CurrentStreak,
    LongestStreak,
    TotalXp,
    RoundsWon,
    BestScore,
    UniqueWords,
    PerfectGames,
}

impl BadgeMetric {
    fn value(self, stats: &PlayerStats) -> u64 {
        match self {
            BadgeMetric::CurrentStreak => u64::from(stats.current_streak),
            BadgeMetric::LongestStreak => u64::from(stats.longest_streak),
            BadgeMetric::TotalXp => stats.total_xp,
            BadgeMetric::RoundsWon => u64::from(stats.rounds_won),
            BadgeMetric::BestScore => u64::from(stats.best_score),
            BadgeMetric::UniqueWords => u64::from(stats.unique_words),
            BadgeMetric::PerfectGames => u64::from(stats.perfect_games),
        }
    }
}

/// Declarative unlock condition: `metric >= threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRule {
    pub badge_type: String,
    pub name: String,
    pub description: String,
    pub metric: BadgeMetric,
    pub threshold: u64,
}

impl BadgeRule {
    fn new(
        badge_type: &str,
        name: &str,
        description: &str,
        metric: BadgeMetric,
        threshold: u64,
    ) -> Self {
        Self {
            badge_type: badge_type.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            metric,
            threshold,
        }
    }

    pub fn is_satisfied(&self, stats: &PlayerStats) -> bool {
        self.metric.value(stats) >= self.threshold
    }
}

static BADGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_badge_id() -> BadgeId {
    let id = BADGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BadgeId(format!("badge-{id:06}"))
}

/// Checks stats against the rule catalog and issues missing badges.
#[derive(Debug, Clone)]
pub struct BadgeEvaluator {
    rules: Vec<BadgeRule>,
}

impl Default for BadgeEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

impl BadgeEvaluator {
    /// Catalog used by the game client.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                BadgeRule::new(
                    "first_win",
                    "First Victory",
                    "Won your first debate",
                    BadgeMetric::RoundsWon,
                    1,
                ),
                BadgeRule::new(
                    "streak_master",
                    "Streak Master",
                    "Maintained a 5-day streak",
                    BadgeMetric::CurrentStreak,
                    5,
                ),
                BadgeRule::new(
                    "high_scorer",
                    "High Scorer",
                    "Achieved a score of 8 out of 10 or higher",
                    BadgeMetric::BestScore,
                    80,
                ),
                BadgeRule::new(
                    "creative",
                    "Creative Thinker",
                    "Used 20 or more unique words",
                    BadgeMetric::UniqueWords,
                    20,
                ),
                BadgeRule::new(
                    "perfect",
                    "Perfect Player",
                    "Persuaded the AI in every round of a game",
                    BadgeMetric::PerfectGames,
                    1,
                ),
            ],
        }
    }

    pub fn with_rules(rules: Vec<BadgeRule>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.badge_type.trim().is_empty() {
                return Err(EngineError::validation("badge type must not be blank"));
            }
            if !seen.insert(rule.badge_type.as_str()) {
                return Err(EngineError::validation(format!(
                    "badge type '{}' defined more than once",
                    rule.badge_type
                )));
            }
        }
        Ok(Self { rules })
    }

    /// Load a rule catalog from a JSON array of [`BadgeRule`].
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, EngineError> {
        let rules: Vec<BadgeRule> = serde_json::from_reader(reader)
            .map_err(|err| EngineError::validation(format!("invalid badge rules: {err}")))?;
        Self::with_rules(rules)
    }

    pub fn rules(&self) -> &[BadgeRule] {
        &self.rules
    }

    pub fn rule(&self, badge_type: &str) -> Option<&BadgeRule> {
        self.rules.iter().find(|rule| rule.badge_type == badge_type)
    }

    /// Badges whose rule holds and which the user does not already hold actively.
    pub fn check_and_award(
        &self,
        user_id: &UserId,
        stats: &PlayerStats,
        existing: &[Badge],
        earned_at: DateTime<Utc>,
    ) -> Vec<Badge> {
        let held: HashSet<&str> = existing
            .iter()
            .filter(|badge| badge.active && &badge.user_id == user_id)
            .map(|badge| badge.badge_type.as_str())
            .collect();

        self.rules
            .iter()
            .filter(|rule| !held.contains(rule.badge_type.as_str()) && rule.is_satisfied(stats))
            .map(|rule| Badge {
                badge_id: next_badge_id(),
                user_id: user_id.clone(),
                badge_type: rule.badge_type.clone(),
                name: rule.name.clone(),
                description: rule.description.clone(),
                earned_at,
                active: true,
            })
            .collect()
    }
}
