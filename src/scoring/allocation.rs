use serde::{Deserialize, Serialize};

use crate::error::LeagueError;

pub const HOLE_COUNT: usize = 18;
pub const NINE: usize = 9;

/// A course's stroke-allocation ranking: `ranks[i]` is the difficulty rank of
/// hole `i + 1`, where rank 1 is the hardest hole and receives the first
/// handicap stroke.
///
/// The ranking is always a permutation of `1..=18`, even when only nine holes
/// are played, because nine-hole allocation is derived from the full card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct StrokeAllocationTable {
    ranks: [i32; HOLE_COUNT],
}

impl StrokeAllocationTable {
    /// # Errors
    ///
    /// Will return `Err` if `ranks` is not a permutation of 1..=18
    pub fn new(ranks: [i32; HOLE_COUNT]) -> Result<Self, LeagueError> {
        let mut seen = [false; HOLE_COUNT];
        for (idx, &rank) in ranks.iter().enumerate() {
            let slot = usize::try_from(rank)
                .ok()
                .filter(|r| (1..=HOLE_COUNT).contains(r))
                .ok_or_else(|| {
                    LeagueError::AllocationTable(format!(
                        "hole {} has rank {rank}, expected a value in 1..=18",
                        idx + 1
                    ))
                })?;
            if seen[slot - 1] {
                return Err(LeagueError::AllocationTable(format!(
                    "rank {rank} is assigned to more than one hole"
                )));
            }
            seen[slot - 1] = true;
        }
        Ok(Self { ranks })
    }

    /// # Errors
    ///
    /// Will return `Err` if the slice does not hold exactly 18 ranks forming a permutation of 1..=18
    pub fn from_slice(ranks: &[i32]) -> Result<Self, LeagueError> {
        let ranks: [i32; HOLE_COUNT] = ranks.try_into().map_err(|_| {
            LeagueError::AllocationTable(format!(
                "expected {HOLE_COUNT} hole ranks, found {}",
                ranks.len()
            ))
        })?;
        Self::new(ranks)
    }

    #[must_use]
    pub fn ranks(&self) -> &[i32; HOLE_COUNT] {
        &self.ranks
    }

    /// Full-card rank for the hole at `hole_index` (0-based).
    #[must_use]
    pub fn rank(&self, hole_index: usize) -> i32 {
        self.ranks[hole_index]
    }

    /// Rank of a hole on a 1..=9 scale for a single nine: `ceil(rank / 2)`.
    /// Full-card ranks 1 and 2 both become 1, 3 and 4 become 2, and so on.
    #[must_use]
    pub fn nine_hole_rank(&self, hole_index: usize) -> i32 {
        (self.ranks[hole_index] + 1) / 2
    }
}

impl TryFrom<[i32; HOLE_COUNT]> for StrokeAllocationTable {
    type Error = LeagueError;

    fn try_from(value: [i32; HOLE_COUNT]) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Vec<i32>> for StrokeAllocationTable {
    type Error = LeagueError;

    fn try_from(value: Vec<i32>) -> Result<Self, Self::Error> {
        Self::from_slice(&value)
    }
}

impl From<StrokeAllocationTable> for Vec<i32> {
    fn from(value: StrokeAllocationTable) -> Self {
        value.ranks.to_vec()
    }
}
