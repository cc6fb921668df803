use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LeagueError;

/// Skill grouping; rankings and points are computed within a flight.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flight {
    A,
    B,
    C,
    D,
}

impl Flight {
    pub const ALL: [Flight; 4] = [Flight::A, Flight::B, Flight::C, Flight::D];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Flight::A => "A",
            Flight::B => "B",
            Flight::C => "C",
            Flight::D => "D",
        }
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Flight {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Flight::A),
            "B" => Ok(Flight::B),
            "C" => Ok(Flight::C),
            "D" => Ok(Flight::D),
            other => Err(LeagueError::Validation(format!("unknown flight '{other}'"))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Member {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub flight: Flight,
    pub handicap_index: f64,
    pub is_admin: bool,
    pub is_checked_in: bool,
    pub has_submitted_current_round: bool,
    pub wallet_balance: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewMember {
    pub display_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub flight: Flight,
    #[serde(default)]
    pub handicap_index: f64,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewMember {
    /// A signup: new members start in flight D with a zero handicap.
    #[must_use]
    pub fn signup(display_name: &str, email: &str, phone_number: Option<&str>) -> Self {
        Self {
            display_name: display_name.trim().to_string(),
            email: email.trim().to_ascii_lowercase(),
            phone_number: phone_number.map(|p| p.trim().to_string()),
            flight: Flight::D,
            handicap_index: 0.0,
            is_admin: false,
        }
    }
}
