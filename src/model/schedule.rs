use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::scoring::TEE_COLORS;

pub const GAME_FORMATS: [&str; 8] = [
    "Individual Stroke Play",
    "Chicago",
    "2-Man Best Ball",
    "Stableford",
    "Modified Stableford",
    "Match Play",
    "Scramble",
    "Shamrock",
];

pub const COURSE_NINES: [&str; 3] = ["Front 9", "Back 9", "Full 18"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScheduleWeek {
    #[serde(default)]
    pub id: i64,
    pub week_number: i64,
    /// ISO `YYYY-MM-DD`.
    pub week_date: Option<String>,
    pub game_name: String,
    pub tee_color: String,
    pub course_nine: String,
}

impl ScheduleWeek {
    /// # Errors
    ///
    /// Will return `Err` if the game, nine, tee or date is not one the league recognises
    pub fn validate(&self) -> Result<(), LeagueError> {
        if !GAME_FORMATS.contains(&self.game_name.as_str()) {
            return Err(LeagueError::Validation(format!(
                "unknown game format '{}'",
                self.game_name
            )));
        }
        if !COURSE_NINES.contains(&self.course_nine.as_str()) {
            return Err(LeagueError::Validation(format!(
                "unknown course nine '{}'",
                self.course_nine
            )));
        }
        if !TEE_COLORS.contains(&self.tee_color.as_str()) {
            return Err(LeagueError::Validation(format!(
                "unknown tee color '{}'",
                self.tee_color
            )));
        }
        if let Some(date) = self.week_date.as_deref().filter(|d| !d.is_empty()) {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| LeagueError::Validation(format!("bad week date '{date}': {e}")))?;
        }
        Ok(())
    }

    /// Display date such as "Tue, Jun 03", or "TBD".
    #[must_use]
    pub fn display_date(&self) -> String {
        self.week_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map_or_else(|| "TBD".to_string(), |d| d.format("%a, %b %d").to_string())
    }
}
