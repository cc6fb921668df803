use crate::error::LeagueError;
use crate::model::Flight;
use crate::scoring::{SeasonStandingsEntry, StandingsLedger, WeeklyFinish};
use crate::storage::Storage;

pub type WeeklyStandings = Vec<(Flight, Vec<WeeklyFinish>)>;

/// Verified finishes for one week, grouped by flight, computed straight from storage.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn weekly_standings(
    storage: &dyn Storage,
    week_number: i64,
) -> Result<WeeklyStandings, LeagueError> {
    let cards = storage.list_card_results().await?;
    let ledger = StandingsLedger::rebuild(cards.into_iter().filter(|c| c.week_number == week_number));
    Ok(owned_week(&ledger, week_number))
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn season_standings(
    storage: &dyn Storage,
) -> Result<Vec<SeasonStandingsEntry>, LeagueError> {
    let cards = storage.list_card_results().await?;
    Ok(crate::scoring::season_standings(&cards))
}

pub(crate) fn owned_week(ledger: &StandingsLedger, week_number: i64) -> WeeklyStandings {
    ledger
        .week(week_number)
        .into_iter()
        .map(|(flight, finishes)| (flight, finishes.to_vec()))
        .collect()
}
