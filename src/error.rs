use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeagueError {
    /// An active hole has no gross score. `hole` is 1-based.
    #[error("missing score: please enter a score for hole {hole}")]
    IncompleteRound { hole: usize },
    #[error("invalid round configuration: {0}")]
    InvalidRoundConfiguration(String),
    #[error("invalid stroke allocation table: {0}")]
    AllocationTable(String),
    #[error("member {member_id} already submitted a scorecard for week {week}")]
    ScorecardLocked { member_id: i64, week: i64 },
    #[error("scoring is currently closed by the course")]
    ScoringClosed,
    #[error("only the paired partner or an admin can verify this scorecard")]
    NotPartner,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("db error: {0}")]
    Db(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl LeagueError {
    /// True for errors caused by the caller's input rather than by storage.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Db(_) | Self::Parse(_))
    }
}

impl From<StorageError> for LeagueError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(what),
            other => Self::Db(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for LeagueError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::Parse(err.to_string())
    }
}
