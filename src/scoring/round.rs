use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::LeagueError;
use crate::scoring::allocation::{HOLE_COUNT, NINE};

pub const TEE_COLORS: [&str; 4] = ["White", "Blue", "Black", "Red"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Front => "Front",
            Side::Back => "Back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Front" => Ok(Side::Front),
            "Back" => Ok(Side::Back),
            other => Err(LeagueError::InvalidRoundConfiguration(format!(
                "unknown side '{other}'"
            ))),
        }
    }
}

/// Which holes are in play this week and from which tees. A nine-hole round
/// always names its side, so "nine holes on All" cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "holes", rename_all = "snake_case")]
pub enum RoundConfiguration {
    Full18 { tee: String },
    Nine { side: Side, tee: String },
}

impl RoundConfiguration {
    /// Builds a configuration from the persisted `holes_to_play`,
    /// `side_to_play` and `tee_color` settings.
    ///
    /// # Errors
    ///
    /// Will return `Err` if holes is not 9 or 18, if a nine-hole round has side
    /// "All" or an unknown side, or if the tee color is not one of [`TEE_COLORS`]
    pub fn from_settings(
        holes_to_play: i64,
        side_to_play: &str,
        tee_color: &str,
    ) -> Result<Self, LeagueError> {
        let tee = validate_tee(tee_color)?;
        match holes_to_play {
            18 => Ok(RoundConfiguration::Full18 { tee }),
            9 => {
                if side_to_play.trim() == "All" {
                    return Err(LeagueError::InvalidRoundConfiguration(
                        "a 9 hole round must be played on the Front or Back side, not All"
                            .to_string(),
                    ));
                }
                let side = side_to_play.parse()?;
                Ok(RoundConfiguration::Nine { side, tee })
            }
            other => Err(LeagueError::InvalidRoundConfiguration(format!(
                "holes to play must be 9 or 18, got {other}"
            ))),
        }
    }

    #[must_use]
    pub fn holes_to_play(&self) -> i64 {
        match self {
            RoundConfiguration::Full18 { .. } => 18,
            RoundConfiguration::Nine { .. } => 9,
        }
    }

    /// The persisted `side_to_play` value: "All" for 18 holes.
    #[must_use]
    pub fn side_to_play(&self) -> &'static str {
        match self {
            RoundConfiguration::Full18 { .. } => "All",
            RoundConfiguration::Nine { side, .. } => side.as_str(),
        }
    }

    #[must_use]
    pub fn tee(&self) -> &str {
        match self {
            RoundConfiguration::Full18 { tee } | RoundConfiguration::Nine { tee, .. } => tee,
        }
    }

    #[must_use]
    pub fn is_nine(&self) -> bool {
        matches!(self, RoundConfiguration::Nine { .. })
    }

    /// 0-based indices of the holes in play.
    #[must_use]
    pub fn active_holes(&self) -> Range<usize> {
        match self {
            RoundConfiguration::Full18 { .. } => 0..HOLE_COUNT,
            RoundConfiguration::Nine {
                side: Side::Front, ..
            } => 0..NINE,
            RoundConfiguration::Nine {
                side: Side::Back, ..
            } => NINE..HOLE_COUNT,
        }
    }

    #[must_use]
    pub fn is_active(&self, hole_index: usize) -> bool {
        self.active_holes().contains(&hole_index)
    }

    /// Handicap used for stroke allocation: the season index for 18 holes,
    /// `floor(index / 2)` for nine.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn effective_handicap(&self, handicap_index: f64) -> i32 {
        match self {
            RoundConfiguration::Full18 { .. } => handicap_index.floor() as i32,
            RoundConfiguration::Nine { .. } => (handicap_index / 2.0).floor() as i32,
        }
    }

    /// Short label used on score tables, e.g. "18H" or "Back 9".
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            RoundConfiguration::Full18 { .. } => "18H".to_string(),
            RoundConfiguration::Nine { side, .. } => format!("{side} 9"),
        }
    }
}

fn validate_tee(tee_color: &str) -> Result<String, LeagueError> {
    let tee = tee_color.trim();
    if TEE_COLORS.contains(&tee) {
        Ok(tee.to_string())
    } else {
        Err(LeagueError::InvalidRoundConfiguration(format!(
            "unknown tee color '{tee}', expected one of {TEE_COLORS:?}"
        )))
    }
}
