use super::domain::{Badge, StreakRecord, UserId, XpGrant};

/// Storage abstraction so the progression service can be exercised in isolation.
pub trait ProgressionRepository: Send + Sync {
    fn insert_streak(&self, record: StreakRecord) -> Result<StreakRecord, RepositoryError>;
    fn update_streak(&self, record: StreakRecord) -> Result<(), RepositoryError>;
    fn fetch_streak(&self, user_id: &UserId) -> Result<Option<StreakRecord>, RepositoryError>;

    fn append_grant(&self, grant: XpGrant) -> Result<(), RepositoryError>;
    fn grants(&self, user_id: &UserId) -> Result<Vec<XpGrant>, RepositoryError>;

    fn insert_badge(&self, badge: Badge) -> Result<Badge, RepositoryError>;
    fn update_badge(&self, badge: Badge) -> Result<(), RepositoryError>;
    /// All badges for the user, inactive ones included, in award order.
    fn badges(&self, user_id: &UserId) -> Result<Vec<Badge>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
