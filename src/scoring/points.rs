use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::Flight;

/// Points for 1st through 7th place. Everyone below 7th earns [`PARTICIPATION_POINTS`].
pub const POINTS_DISTRIBUTION: [u32; 7] = [500, 300, 190, 135, 110, 90, 70];
pub const PARTICIPATION_POINTS: u32 = 50;

/// Season points for a finishing position within a flight (1-based).
#[must_use]
pub fn points_for_rank(rank: usize) -> u32 {
    rank.checked_sub(1)
        .and_then(|idx| POINTS_DISTRIBUTION.get(idx))
        .copied()
        .unwrap_or(PARTICIPATION_POINTS)
}

/// One member's scored round for a week, as used for ranking.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CardResult {
    pub member_id: i64,
    pub display_name: String,
    pub flight: Flight,
    pub week_number: i64,
    pub gross: i32,
    pub net: i32,
    pub is_verified: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WeeklyFinish {
    pub position: usize,
    pub points: u32,
    pub member_id: i64,
    pub display_name: String,
    pub flight: Flight,
    pub week_number: i64,
    pub gross: i32,
    pub net: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WeekPlacing {
    pub position: usize,
    pub points: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SeasonStandingsEntry {
    pub member_id: i64,
    pub display_name: String,
    pub flight: Flight,
    pub weeks: BTreeMap<i64, WeekPlacing>,
    pub total_points: u32,
    pub events_played: usize,
}

/// Ranks one flight's verified cards for one week: lowest net first, then
/// lowest gross, then lowest member id. Positions are 1, 2, 3, ... with no
/// shared places. Unverified cards are skipped.
#[must_use]
pub fn rank_flight_week(cards: &[CardResult]) -> Vec<WeeklyFinish> {
    let mut verified: Vec<&CardResult> = cards.iter().filter(|c| c.is_verified).collect();
    verified.sort_by(|a, b| {
        a.net
            .cmp(&b.net)
            .then_with(|| a.gross.cmp(&b.gross))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });

    verified
        .into_iter()
        .enumerate()
        .map(|(idx, card)| WeeklyFinish {
            position: idx + 1,
            points: points_for_rank(idx + 1),
            member_id: card.member_id,
            display_name: card.display_name.clone(),
            flight: card.flight,
            week_number: card.week_number,
            gross: card.gross,
            net: card.net,
        })
        .collect()
}

/// Sums weekly finishes into season standings, best total first.
///
/// Ties on points fall back to more events played, then display name, then member id.
#[must_use]
pub fn aggregate_season<'a>(
    finishes: impl IntoIterator<Item = &'a WeeklyFinish>,
) -> Vec<SeasonStandingsEntry> {
    let mut by_member: BTreeMap<i64, SeasonStandingsEntry> = BTreeMap::new();
    for finish in finishes {
        let entry = by_member
            .entry(finish.member_id)
            .or_insert_with(|| SeasonStandingsEntry {
                member_id: finish.member_id,
                display_name: finish.display_name.clone(),
                flight: finish.flight,
                weeks: BTreeMap::new(),
                total_points: 0,
                events_played: 0,
            });
        let placing = WeekPlacing {
            position: finish.position,
            points: finish.points,
        };
        if entry.weeks.insert(finish.week_number, placing).is_none() {
            entry.events_played += 1;
        }
    }

    let mut standings: Vec<SeasonStandingsEntry> = by_member
        .into_values()
        .map(|mut entry| {
            entry.total_points = entry.weeks.values().map(|w| w.points).sum();
            entry
        })
        .collect();

    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.events_played.cmp(&a.events_played))
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    standings
}
