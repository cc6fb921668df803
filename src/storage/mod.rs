use async_trait::async_trait;
use std::error::Error;
use std::fmt;

use crate::model::{
    Course, Flight, LeagueSettings, Member, NewCourse, NewMember, NewScorecard, Pairing,
    ScheduleWeek, Scorecard,
};
use crate::scoring::CardResult;

pub mod sql;

pub use sql::SqlStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested row does not exist.
    NotFound(String),
    /// The backend failed or returned a row we could not read.
    Query(String),
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(what) => write!(f, "{what} not found"),
            StorageError::Query(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StorageError {}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Member fields an admin or the member can change after signup.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberUpdate {
    Profile {
        display_name: String,
        phone_number: Option<String>,
    },
    HandicapIndex(f64),
    Flight(Flight),
    CheckedIn(bool),
    SubmittedCurrentRound(bool),
    /// Added to the current wallet balance.
    CreditWallet(f64),
}

/// Everything the league service reads and writes.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_settings(&self) -> Result<LeagueSettings, StorageError>;
    async fn save_settings(&self, settings: &LeagueSettings) -> Result<(), StorageError>;

    /// The course rounds are scored on: the first course by id.
    async fn get_active_course(&self) -> Result<Course, StorageError>;
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;
    async fn insert_course(&self, course: &NewCourse) -> Result<i64, StorageError>;
    async fn set_course_open(&self, course_id: i64, is_open: bool) -> Result<(), StorageError>;

    async fn get_member(&self, member_id: i64) -> Result<Member, StorageError>;
    async fn list_members(&self) -> Result<Vec<Member>, StorageError>;
    async fn insert_member(&self, member: &NewMember) -> Result<i64, StorageError>;
    async fn update_member(&self, member_id: i64, update: MemberUpdate)
    -> Result<(), StorageError>;
    /// Clears checked-in and submitted flags for every non-admin member.
    async fn reset_round_flags(&self) -> Result<(), StorageError>;

    async fn get_scorecard(
        &self,
        member_id: i64,
        week_number: i64,
    ) -> Result<Option<Scorecard>, StorageError>;
    async fn list_scorecards_for_week(&self, week_number: i64)
    -> Result<Vec<Scorecard>, StorageError>;
    async fn insert_scorecard(&self, card: &NewScorecard) -> Result<Scorecard, StorageError>;
    async fn set_scorecard_verified(&self, scorecard_id: i64) -> Result<(), StorageError>;
    async fn set_scorecard_winnings(
        &self,
        scorecard_id: i64,
        winnings: f64,
    ) -> Result<(), StorageError>;
    async fn delete_scorecard(&self, member_id: i64, week_number: i64)
    -> Result<bool, StorageError>;
    /// Every card joined with its member's name and flight, for ranking.
    async fn list_card_results(&self) -> Result<Vec<CardResult>, StorageError>;

    async fn get_pairings(&self, week_number: i64) -> Result<Vec<Pairing>, StorageError>;
    /// Removes any pairing `member_id` is in for the week, then pairs with
    /// `partner_id` when given.
    async fn set_pairing(
        &self,
        week_number: i64,
        member_id: i64,
        partner_id: Option<i64>,
    ) -> Result<(), StorageError>;

    async fn list_schedule(&self) -> Result<Vec<ScheduleWeek>, StorageError>;
    async fn upsert_schedule_week(&self, week: &ScheduleWeek) -> Result<(), StorageError>;
}
