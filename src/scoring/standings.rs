use ahash::RandomState;
use std::collections::{BTreeMap, HashMap};

use crate::model::Flight;
use crate::scoring::points::{
    CardResult, SeasonStandingsEntry, WeeklyFinish, aggregate_season, rank_flight_week,
};

type Bucket = (i64, Flight);

/// Season standings kept up to date card by card.
///
/// Cards are grouped by (week, flight). A change to one card re-ranks only the
/// bucket(s) that card belongs to; the season table is folded from the ranked
/// buckets on demand.
#[derive(Debug, Default, Clone)]
pub struct StandingsLedger {
    cards: HashMap<(i64, i64), CardResult, RandomState>,
    ranked: BTreeMap<Bucket, Vec<WeeklyFinish>>,
}

impl StandingsLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rebuild<I>(cards: I) -> Self
    where
        I: IntoIterator<Item = CardResult>,
    {
        let mut ledger = Self::new();
        let mut touched: Vec<Bucket> = Vec::new();
        for card in cards {
            let bucket = (card.week_number, card.flight);
            if !touched.contains(&bucket) {
                touched.push(bucket);
            }
            ledger.cards.insert((card.member_id, card.week_number), card);
        }
        for bucket in touched {
            ledger.rerank(bucket);
        }
        ledger
    }

    /// Adds or replaces a member's card for its week. Returns the buckets that were re-ranked.
    pub fn upsert(&mut self, card: CardResult) -> Vec<(i64, Flight)> {
        let key = (card.member_id, card.week_number);
        let new_bucket = (card.week_number, card.flight);
        let old_bucket = self
            .cards
            .insert(key, card)
            .map(|old| (old.week_number, old.flight));

        let mut touched = vec![new_bucket];
        if let Some(old) = old_bucket.filter(|old| *old != new_bucket) {
            touched.push(old);
        }
        for bucket in &touched {
            self.rerank(*bucket);
        }
        touched
    }

    /// Drops a member's card for a week, e.g. after an admin reset.
    pub fn remove(&mut self, member_id: i64, week_number: i64) -> Option<(i64, Flight)> {
        let removed = self.cards.remove(&(member_id, week_number))?;
        let bucket = (removed.week_number, removed.flight);
        self.rerank(bucket);
        Some(bucket)
    }

    fn rerank(&mut self, bucket: Bucket) {
        let cards: Vec<CardResult> = self
            .cards
            .values()
            .filter(|c| (c.week_number, c.flight) == bucket)
            .cloned()
            .collect();
        let finishes = rank_flight_week(&cards);
        if finishes.is_empty() {
            self.ranked.remove(&bucket);
        } else {
            self.ranked.insert(bucket, finishes);
        }
    }

    /// Ranked finishes for one week and flight.
    #[must_use]
    pub fn flight_week(&self, week_number: i64, flight: Flight) -> &[WeeklyFinish] {
        self.ranked
            .get(&(week_number, flight))
            .map_or(&[], Vec::as_slice)
    }

    /// Every flight's ranked finishes for one week, flights in A..D order.
    #[must_use]
    pub fn week(&self, week_number: i64) -> Vec<(Flight, &[WeeklyFinish])> {
        self.ranked
            .range((week_number, Flight::A)..=(week_number, Flight::D))
            .map(|((_, flight), finishes)| (*flight, finishes.as_slice()))
            .collect()
    }

    #[must_use]
    pub fn season(&self) -> Vec<SeasonStandingsEntry> {
        aggregate_season(self.ranked.values().flatten())
    }
}

/// One-shot season standings over all cards.
#[must_use]
pub fn season_standings(cards: &[CardResult]) -> Vec<SeasonStandingsEntry> {
    StandingsLedger::rebuild(cards.iter().cloned()).season()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(member_id: i64, flight: Flight, week: i64, net: i32) -> CardResult {
        CardResult {
            member_id,
            display_name: format!("Player {member_id}"),
            flight,
            week_number: week,
            gross: net + 5,
            net,
            is_verified: true,
        }
    }

    #[test]
    fn ranks_within_flight_within_week() {
        let ledger = StandingsLedger::rebuild(vec![
            card(1, Flight::A, 1, 34),
            card(2, Flight::A, 1, 30),
            card(3, Flight::B, 1, 40),
            card(4, Flight::B, 1, 29),
        ]);
        let a = ledger.flight_week(1, Flight::A);
        assert_eq!(a[0].member_id, 2);
        assert_eq!(a[1].member_id, 1);
        let b = ledger.flight_week(1, Flight::B);
        assert_eq!(b[0].member_id, 4);
        assert_eq!(b[0].points, 500);
        assert_eq!(ledger.week(1).len(), 2);
    }

    #[test]
    fn three_week_season_example() {
        // member 1 finishes 1st, 3rd, 1st in flight A
        let mut cards = vec![
            card(1, Flight::A, 1, 30),
            card(2, Flight::A, 1, 35),
            card(1, Flight::A, 2, 38),
            card(2, Flight::A, 2, 33),
            card(3, Flight::A, 2, 31),
            card(1, Flight::A, 3, 29),
        ];
        cards.push(card(4, Flight::A, 3, 40));
        let standings = season_standings(&cards);
        let pat = standings.iter().find(|s| s.member_id == 1).unwrap();
        assert_eq!(pat.total_points, 1190);
        assert_eq!(pat.events_played, 3);
        assert_eq!(standings[0].member_id, 1);
    }

    #[test]
    fn upsert_touches_only_the_affected_bucket() {
        let mut ledger = StandingsLedger::rebuild(vec![
            card(1, Flight::A, 1, 30),
            card(2, Flight::B, 1, 30),
            card(3, Flight::A, 2, 30),
        ]);
        let touched = ledger.upsert(card(4, Flight::A, 1, 25));
        assert_eq!(touched, vec![(1, Flight::A)]);
        assert_eq!(ledger.flight_week(1, Flight::A)[0].member_id, 4);
        assert_eq!(ledger.flight_week(1, Flight::B)[0].member_id, 2);
    }

    #[test]
    fn flight_change_reranks_old_and_new_bucket() {
        let mut ledger = StandingsLedger::rebuild(vec![
            card(1, Flight::A, 1, 30),
            card(2, Flight::A, 1, 32),
        ]);
        let touched = ledger.upsert(card(1, Flight::B, 1, 30));
        assert_eq!(touched, vec![(1, Flight::B), (1, Flight::A)]);
        assert_eq!(ledger.flight_week(1, Flight::A)[0].member_id, 2);
        assert_eq!(ledger.flight_week(1, Flight::A)[0].position, 1);
    }

    #[test]
    fn removing_a_card_promotes_the_rest() {
        let mut ledger = StandingsLedger::rebuild(vec![
            card(1, Flight::C, 4, 30),
            card(2, Flight::C, 4, 32),
        ]);
        assert_eq!(ledger.remove(1, 4), Some((4, Flight::C)));
        assert_eq!(ledger.flight_week(4, Flight::C)[0].member_id, 2);
        assert_eq!(ledger.remove(1, 4), None);
        ledger.remove(2, 4);
        assert!(ledger.week(4).is_empty());
    }

    #[test]
    fn unverify_via_upsert_drops_the_finish() {
        let mut ledger = StandingsLedger::rebuild(vec![card(1, Flight::D, 1, 30)]);
        let mut pending = card(1, Flight::D, 1, 30);
        pending.is_verified = false;
        ledger.upsert(pending);
        assert!(ledger.flight_week(1, Flight::D).is_empty());
        assert!(ledger.season().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_card() -> impl Strategy<Value = CardResult> {
            (
                1i64..12,
                prop_oneof![Just(Flight::A), Just(Flight::B), Just(Flight::C)],
                1i64..5,
                25i32..50,
                any::<bool>(),
            )
                .prop_map(|(member_id, flight, week, net, is_verified)| CardResult {
                    member_id,
                    display_name: format!("Player {member_id}"),
                    flight,
                    week_number: week,
                    gross: net + 6,
                    net,
                    is_verified,
                })
        }

        proptest! {
            #[test]
            fn incremental_matches_rebuild(cards in proptest::collection::vec(any_card(), 0..40)) {
                let mut ledger = StandingsLedger::new();
                let mut latest: HashMap<(i64, i64), CardResult> = HashMap::new();
                for card in &cards {
                    ledger.upsert(card.clone());
                    latest.insert((card.member_id, card.week_number), card.clone());
                }
                let rebuilt = StandingsLedger::rebuild(latest.into_values());
                prop_assert_eq!(ledger.season(), rebuilt.season());
            }
        }
    }
}
