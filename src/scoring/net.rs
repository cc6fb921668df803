use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::scoring::allocation::{HOLE_COUNT, NINE, StrokeAllocationTable};
use crate::scoring::round::RoundConfiguration;

/// Gross strokes per hole. `0` means the hole has not been entered.
pub type HoleScores = [i32; HOLE_COUNT];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleResult {
    /// 1-based hole number.
    pub hole: usize,
    pub gross: i32,
    pub pops: i32,
    pub net: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetScorecard {
    pub effective_handicap: i32,
    /// Scored active holes only, in hole order.
    pub holes: Vec<HoleResult>,
    pub total_gross: i32,
    pub total_net: i32,
    pub total_pops: i32,
    pub out_gross: i32,
    pub in_gross: i32,
}

impl NetScorecard {
    #[must_use]
    pub fn hole(&self, hole: usize) -> Option<&HoleResult> {
        self.holes.iter().find(|h| h.hole == hole)
    }
}

/// Applies a player's handicap strokes to gross hole scores for one round.
#[derive(Debug, Clone, Copy)]
pub struct NetScoreCalculator<'a> {
    table: &'a StrokeAllocationTable,
    config: &'a RoundConfiguration,
    effective_handicap: i32,
}

impl<'a> NetScoreCalculator<'a> {
    #[must_use]
    pub fn new(
        table: &'a StrokeAllocationTable,
        config: &'a RoundConfiguration,
        effective_handicap: i32,
    ) -> Self {
        Self {
            table,
            config,
            effective_handicap,
        }
    }

    /// Builds a calculator from the member's season handicap index, halving it
    /// for nine-hole rounds.
    #[must_use]
    pub fn for_handicap_index(
        table: &'a StrokeAllocationTable,
        config: &'a RoundConfiguration,
        handicap_index: f64,
    ) -> Self {
        Self::new(table, config, config.effective_handicap(handicap_index))
    }

    #[must_use]
    pub fn effective_handicap(&self) -> i32 {
        self.effective_handicap
    }

    /// Strokes received on the hole at `hole_index` (0-based): one once the
    /// handicap reaches the hole's rank, a second once it reaches the rank
    /// plus the number of holes in play.
    #[must_use]
    pub fn pops(&self, hole_index: usize) -> i32 {
        let (side_rank, lap) = if self.config.is_nine() {
            (self.table.nine_hole_rank(hole_index), NINE as i32)
        } else {
            (self.table.rank(hole_index), HOLE_COUNT as i32)
        };
        i32::from(self.effective_handicap >= side_rank)
            + i32::from(self.effective_handicap >= side_rank + lap)
    }

    /// Net result over the active holes that have a gross score. Unentered and
    /// inactive holes are left out of the totals and of `holes`.
    #[must_use]
    pub fn calculate(&self, gross: &HoleScores) -> NetScorecard {
        let holes: Vec<HoleResult> = self
            .config
            .active_holes()
            .filter(|&i| gross[i] > 0)
            .map(|i| {
                let pops = self.pops(i);
                HoleResult {
                    hole: i + 1,
                    gross: gross[i],
                    pops,
                    net: gross[i] - pops,
                }
            })
            .collect();

        let total_gross = holes.iter().map(|h| h.gross).sum();
        let total_net = holes.iter().map(|h| h.net).sum();
        let total_pops = holes.iter().map(|h| h.pops).sum();
        let out_gross = holes.iter().filter(|h| h.hole <= NINE).map(|h| h.gross).sum();
        let in_gross = holes.iter().filter(|h| h.hole > NINE).map(|h| h.gross).sum();

        NetScorecard {
            effective_handicap: self.effective_handicap,
            holes,
            total_gross,
            total_net,
            total_pops,
            out_gross,
            in_gross,
        }
    }

    /// Same as [`calculate`](Self::calculate) but gated on a complete card.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any active hole has no gross score
    pub fn calculate_submission(&self, gross: &HoleScores) -> Result<NetScorecard, LeagueError> {
        ensure_complete(gross, self.config)?;
        Ok(self.calculate(gross))
    }
}

/// # Errors
///
/// Will return `Err` with the first active hole (1-based) that has no positive gross score
pub fn ensure_complete(gross: &HoleScores, config: &RoundConfiguration) -> Result<(), LeagueError> {
    match config.active_holes().find(|&i| gross[i] <= 0) {
        Some(i) => Err(LeagueError::IncompleteRound { hole: i + 1 }),
        None => Ok(()),
    }
}

/// Zeroes every hole outside the round so a stored card only carries the holes played.
#[must_use]
pub fn mask_inactive(gross: &HoleScores, config: &RoundConfiguration) -> HoleScores {
    let mut masked = *gross;
    for (i, value) in masked.iter_mut().enumerate() {
        if !config.is_active(i) {
            *value = 0;
        }
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANKS: [i32; HOLE_COUNT] = [
        7, 1, 13, 5, 17, 3, 15, 9, 11, 8, 2, 14, 6, 18, 4, 16, 10, 12,
    ];

    fn table() -> StrokeAllocationTable {
        StrokeAllocationTable::new(RANKS).unwrap()
    }

    fn config(holes: i64, side: &str) -> RoundConfiguration {
        RoundConfiguration::from_settings(holes, side, "White").unwrap()
    }

    #[test]
    fn nine_hole_front_example() {
        let table = table();
        let front = config(9, "Front");
        let calc = NetScoreCalculator::new(&table, &front, 10);
        // hole 2 has rank 1 -> side rank 1 -> 10 >= 1 and 10 >= 10
        assert_eq!(calc.pops(1), 2);
        // hole 1 has rank 7 -> side rank 4 -> 10 >= 4 but 10 < 13
        assert_eq!(calc.pops(0), 1);
    }

    #[test]
    fn eighteen_hole_second_stroke_boundary() {
        let mut ranks = RANKS;
        // put rank 3 on hole 1, swap the old rank 3 holder
        let pos = ranks.iter().position(|&r| r == 3).unwrap();
        ranks.swap(0, pos);
        let table = StrokeAllocationTable::new(ranks).unwrap();
        let full = config(18, "All");

        assert_eq!(NetScoreCalculator::new(&table, &full, 20).pops(0), 1);
        assert_eq!(NetScoreCalculator::new(&table, &full, 21).pops(0), 2);
        assert_eq!(NetScoreCalculator::new(&table, &full, 2).pops(0), 0);
    }

    #[test]
    fn totals_only_cover_active_scored_holes() {
        let table = table();
        let back = config(9, "Back");
        let mut gross = [5; HOLE_COUNT];
        gross[12] = 0;
        let card = NetScoreCalculator::new(&table, &back, 0).calculate(&gross);
        assert_eq!(card.holes.len(), 8);
        assert!(card.hole(1).is_none());
        assert!(card.hole(13).is_none());
        assert_eq!(card.total_gross, 40);
        assert_eq!(card.total_net, 40);
        assert_eq!(card.out_gross, 0);
        assert_eq!(card.in_gross, 40);
    }

    #[test]
    fn submission_requires_every_active_hole() {
        let table = table();
        let front = config(9, "Front");
        let mut gross = [0; HOLE_COUNT];
        for g in gross.iter_mut().take(9) {
            *g = 4;
        }
        gross[6] = 0;
        let calc = NetScoreCalculator::for_handicap_index(&table, &front, 12.0);
        assert_eq!(
            calc.calculate_submission(&gross),
            Err(LeagueError::IncompleteRound { hole: 7 })
        );

        gross[6] = 5;
        let card = calc.calculate_submission(&gross).unwrap();
        assert_eq!(card.effective_handicap, 6);
        assert_eq!(card.total_gross, 37);
        assert_eq!(card.total_gross - card.total_net, card.total_pops);
    }

    #[test]
    fn back_nine_ignores_front_holes_for_completeness() {
        let back = config(9, "Back");
        let mut gross = [0; HOLE_COUNT];
        for g in gross.iter_mut().skip(9) {
            *g = 4;
        }
        assert!(ensure_complete(&gross, &back).is_ok());
        assert_eq!(
            ensure_complete(&gross, &config(18, "All")),
            Err(LeagueError::IncompleteRound { hole: 1 })
        );
    }

    #[test]
    fn negative_gross_counts_as_missing() {
        let full = config(18, "All");
        let mut gross = [4; HOLE_COUNT];
        gross[3] = -2;
        assert_eq!(
            ensure_complete(&gross, &full),
            Err(LeagueError::IncompleteRound { hole: 4 })
        );
    }

    #[test]
    fn masks_holes_outside_the_round() {
        let front = config(9, "Front");
        let masked = mask_inactive(&[3; HOLE_COUNT], &front);
        assert_eq!(masked[..9], [3; 9]);
        assert_eq!(masked[9..], [0; 9]);
    }

    #[test]
    fn masks_the_front_nine_on_a_back_nine_round() {
        let back = config(9, "Back");
        let mut gross = [4; HOLE_COUNT];
        gross[17] = 6;
        let masked = mask_inactive(&gross, &back);
        assert_eq!(masked[..9], [0; 9]);
        assert_eq!(masked[9..17], [4; 8]);
        assert_eq!(masked[17], 6);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_table() -> impl Strategy<Value = StrokeAllocationTable> {
            Just((1..=18).collect::<Vec<i32>>())
                .prop_shuffle()
                .prop_map(|v| StrokeAllocationTable::from_slice(&v).unwrap())
        }

        /// Odd ranks on one nine, even ranks on the other, shuffled within each nine.
        fn split_table() -> impl Strategy<Value = StrokeAllocationTable> {
            (
                Just((0..9).map(|i| 2 * i + 1).collect::<Vec<i32>>()).prop_shuffle(),
                Just((0..9).map(|i| 2 * i + 2).collect::<Vec<i32>>()).prop_shuffle(),
                any::<bool>(),
            )
                .prop_map(|(odd, even, odd_front)| {
                    let (front, back) = if odd_front { (odd, even) } else { (even, odd) };
                    let ranks: Vec<i32> = front.into_iter().chain(back).collect();
                    StrokeAllocationTable::from_slice(&ranks).unwrap()
                })
        }

        fn any_config() -> impl Strategy<Value = RoundConfiguration> {
            prop_oneof![
                Just(config(18, "All")),
                Just(config(9, "Front")),
                Just(config(9, "Back")),
            ]
        }

        proptest! {
            #[test]
            fn eighteen_hole_net_within_two_of_gross(
                table in any_table(),
                handicap in 0i32..=54,
                gross in proptest::array::uniform18(1i32..=12),
            ) {
                let full = config(18, "All");
                let card = NetScoreCalculator::new(&table, &full, handicap).calculate(&gross);
                prop_assert_eq!(card.holes.len(), 18);
                for hole in &card.holes {
                    prop_assert!(hole.net <= hole.gross);
                    prop_assert!((0..=2).contains(&(hole.gross - hole.net)));
                }
            }

            #[test]
            fn pops_never_decrease_with_handicap(
                table in any_table(),
                round in any_config(),
                handicap in 0i32..=60,
                hole in 0usize..18,
            ) {
                let lower = NetScoreCalculator::new(&table, &round, handicap).pops(hole);
                let higher = NetScoreCalculator::new(&table, &round, handicap + 1).pops(hole);
                prop_assert!(higher >= lower);
            }

            #[test]
            fn split_nines_rerank_onto_one_through_nine(table in split_table()) {
                for side in [0..9usize, 9..18usize] {
                    let mut ranks: Vec<i32> = side.map(|i| table.nine_hole_rank(i)).collect();
                    ranks.sort_unstable();
                    prop_assert_eq!(ranks, (1..=9).collect::<Vec<i32>>());
                }
            }

            #[test]
            fn gross_minus_net_is_total_pops(
                table in any_table(),
                round in any_config(),
                handicap in 0i32..=40,
                gross in proptest::array::uniform18(0i32..=9),
            ) {
                let calc = NetScoreCalculator::new(&table, &round, handicap);
                let card = calc.calculate(&gross);
                let pops: i32 = round
                    .active_holes()
                    .filter(|&i| gross[i] > 0)
                    .map(|i| calc.pops(i))
                    .sum();
                prop_assert_eq!(card.total_gross - card.total_net, pops);
                prop_assert_eq!(card.total_pops, pops);
            }
        }
    }
}
