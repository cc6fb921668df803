use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::scoring::RoundConfiguration;

/// The single league settings row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LeagueSettings {
    pub current_week: i64,
    pub holes_to_play: i64,
    pub tee_color: String,
    pub side_to_play: String,
}

impl LeagueSettings {
    #[must_use]
    pub fn new(current_week: i64, config: &RoundConfiguration) -> Self {
        Self {
            current_week,
            holes_to_play: config.holes_to_play(),
            tee_color: config.tee().to_string(),
            side_to_play: config.side_to_play().to_string(),
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if the stored combination is not a valid round, e.g. 9 holes on "All"
    pub fn round_configuration(&self) -> Result<RoundConfiguration, LeagueError> {
        RoundConfiguration::from_settings(self.holes_to_play, &self.side_to_play, &self.tee_color)
    }

    /// Weeks that can be viewed, 1 through the current week.
    pub fn viewable_weeks(&self) -> impl Iterator<Item = i64> {
        1..=self.current_week.max(1)
    }
}
