use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::controller::standings::{WeeklyStandings, owned_week};
use crate::error::LeagueError;
use crate::scoring::{SeasonStandingsEntry, StandingsLedger};
use crate::storage::Storage;

/// Standings shared by every worker. Loaded from storage on first use, then
/// patched one card at a time as cards are verified or reset.
#[derive(Clone, Default)]
pub struct StandingsCache {
    ledger: Arc<RwLock<Option<StandingsLedger>>>,
}

impl StandingsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn ensure_loaded(&self, storage: &dyn Storage) -> Result<(), LeagueError> {
        if self.ledger.read().await.is_some() {
            return Ok(());
        }
        let mut guard = self.ledger.write().await;
        if guard.is_none() {
            let cards = storage.list_card_results().await?;
            debug!(cards = cards.len(), "standings ledger loaded");
            *guard = Some(StandingsLedger::rebuild(cards));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Will return `Err` if the ledger has to be loaded and the database query fails
    pub async fn weekly(
        &self,
        storage: &dyn Storage,
        week_number: i64,
    ) -> Result<WeeklyStandings, LeagueError> {
        self.ensure_loaded(storage).await?;
        let guard = self.ledger.read().await;
        Ok(guard
            .as_ref()
            .map(|ledger| owned_week(ledger, week_number))
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Will return `Err` if the ledger has to be loaded and the database query fails
    pub async fn season(
        &self,
        storage: &dyn Storage,
    ) -> Result<Vec<SeasonStandingsEntry>, LeagueError> {
        self.ensure_loaded(storage).await?;
        let guard = self.ledger.read().await;
        Ok(guard.as_ref().map(StandingsLedger::season).unwrap_or_default())
    }

    /// Re-reads one member's card for a week and re-ranks only its bucket.
    /// Does nothing until the ledger has been loaded.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database query fails
    pub async fn sync_card(
        &self,
        storage: &dyn Storage,
        member_id: i64,
        week_number: i64,
    ) -> Result<(), LeagueError> {
        let mut guard = self.ledger.write().await;
        let Some(ledger) = guard.as_mut() else {
            return Ok(());
        };
        match storage.get_scorecard(member_id, week_number).await? {
            Some(card) => {
                let member = storage.get_member(member_id).await?;
                let touched = ledger.upsert(card.to_card_result(&member));
                debug!(member_id, week_number, ?touched, "standings re-ranked");
            }
            None => {
                let touched = ledger.remove(member_id, week_number);
                debug!(member_id, week_number, ?touched, "standings card removed");
            }
        }
        Ok(())
    }

    /// Drops the ledger so the next read reloads it, e.g. after a flight change.
    pub async fn invalidate(&self) {
        *self.ledger.write().await = None;
    }
}
