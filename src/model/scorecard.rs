use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::model::Member;
use crate::scoring::{CardResult, HoleScores, RoundConfiguration};

/// A member's card for one week. Field names match the persisted columns.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Scorecard {
    pub id: i64,
    pub member_id: i64,
    pub week_number: i64,
    /// Gross total over the holes played.
    pub score: i32,
    pub net_score: i32,
    pub hole_scores: HoleScores,
    /// Handicap strokes the card was scored with; later index changes do not move it.
    pub effective_handicap: i32,
    pub holes_played: i64,
    pub tee_played: String,
    pub side_played: String,
    pub is_verified: bool,
    pub winnings: f64,
    pub created_at: Option<String>,
}

impl Scorecard {
    /// # Errors
    ///
    /// Will return `Err` if the stored holes/side/tee do not form a valid configuration
    pub fn round_configuration(&self) -> Result<RoundConfiguration, LeagueError> {
        RoundConfiguration::from_settings(self.holes_played, &self.side_played, &self.tee_played)
    }

    #[must_use]
    pub fn to_card_result(&self, member: &Member) -> CardResult {
        CardResult {
            member_id: self.member_id,
            display_name: member.display_name.clone(),
            flight: member.flight,
            week_number: self.week_number,
            gross: self.score,
            net: self.net_score,
            is_verified: self.is_verified,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewScorecard {
    pub member_id: i64,
    pub week_number: i64,
    pub score: i32,
    pub net_score: i32,
    pub hole_scores: HoleScores,
    pub effective_handicap: i32,
    pub holes_played: i64,
    pub tee_played: String,
    pub side_played: String,
    pub is_verified: bool,
}
