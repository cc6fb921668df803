use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::scoring::{HOLE_COUNT, RoundConfiguration, StrokeAllocationTable};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    pub par_values: [i32; HOLE_COUNT],
    pub handicap_values: [i32; HOLE_COUNT],
    /// Scoring open flag; submissions are refused while false.
    pub is_open: bool,
}

impl Course {
    /// # Errors
    ///
    /// Will return `Err` if `handicap_values` is not a permutation of 1..=18
    pub fn allocation(&self) -> Result<StrokeAllocationTable, LeagueError> {
        StrokeAllocationTable::new(self.handicap_values)
    }

    /// Par over the holes in play.
    #[must_use]
    pub fn par_for(&self, config: &RoundConfiguration) -> i32 {
        config.active_holes().map(|i| self.par_values[i]).sum()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewCourse {
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    pub par_values: [i32; HOLE_COUNT],
    pub handicap_values: [i32; HOLE_COUNT],
}

impl NewCourse {
    /// # Errors
    ///
    /// Will return `Err` if the name is blank, a par is outside 3..=6, or the
    /// handicap ranking is not a permutation of 1..=18
    pub fn validate(&self) -> Result<(), LeagueError> {
        if self.name.trim().is_empty() {
            return Err(LeagueError::Validation("course name is required".to_string()));
        }
        if let Some((idx, par)) = self
            .par_values
            .iter()
            .enumerate()
            .find(|(_, par)| !(3..=6).contains(*par))
        {
            return Err(LeagueError::Validation(format!(
                "hole {} has par {par}, expected 3 to 6",
                idx + 1
            )));
        }
        StrokeAllocationTable::new(self.handicap_values)?;
        Ok(())
    }
}
