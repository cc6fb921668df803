use serde::Serialize;
use tracing::{info, warn};

use crate::controller::league::{prepare_scorecard, store_scorecard};
use crate::error::LeagueError;
use crate::model::{
    Flight, LeagueSettings, Member, NewCourse, PlayerRoundStatus, ScheduleWeek, Scorecard,
    find_partner,
};
use crate::scoring::{HoleScores, RoundConfiguration};
use crate::storage::{MemberUpdate, Storage};

/// Lowest and highest handicap index an admin may assign.
pub const HANDICAP_INDEX_RANGE: std::ops::RangeInclusive<f64> = -10.0..=54.0;

/// One line of the tournament ops table.
#[derive(Serialize, Debug, Clone)]
pub struct TournamentOpsRow {
    pub member: Member,
    pub partner: Option<Member>,
    pub scorecard: Option<Scorecard>,
    pub status: PlayerRoundStatus,
}

/// # Errors
///
/// Will return `Err` if the caller does not exist or is not an admin
pub async fn require_admin(storage: &dyn Storage, admin_id: i64) -> Result<Member, LeagueError> {
    let member = storage.get_member(admin_id).await?;
    if member.is_admin {
        Ok(member)
    } else {
        warn!(member_id = admin_id, "admin operation refused");
        Err(LeagueError::Forbidden(format!(
            "member {admin_id} is not an admin"
        )))
    }
}

/// Admin keys in a paper card. It is verified on entry; scoring may be closed.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin, the member already has a
/// card this week, or an active hole is missing
pub async fn enter_paper_scorecard(
    storage: &dyn Storage,
    admin_id: i64,
    member_id: i64,
    gross: &HoleScores,
) -> Result<Scorecard, LeagueError> {
    require_admin(storage, admin_id).await?;
    let member = storage.get_member(member_id).await?;
    let card = prepare_scorecard(storage, &member, gross, true).await?;
    let stored = store_scorecard(storage, &card).await?;
    info!(admin_id, member_id, week = stored.week_number, "paper scorecard entered");
    Ok(stored)
}

/// Deletes a member's card. A current-week reset lets them submit again.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin or the card does not exist
pub async fn reset_scorecard(
    storage: &dyn Storage,
    admin_id: i64,
    member_id: i64,
    week_number: i64,
) -> Result<(), LeagueError> {
    require_admin(storage, admin_id).await?;
    if !storage.delete_scorecard(member_id, week_number).await? {
        return Err(LeagueError::NotFound(format!(
            "scorecard for member {member_id} in week {week_number}"
        )));
    }
    if week_number == storage.get_settings().await?.current_week {
        storage
            .update_member(member_id, MemberUpdate::SubmittedCurrentRound(false))
            .await?;
    }
    info!(admin_id, member_id, week_number, "scorecard reset");
    Ok(())
}

/// Moves the league to the next week with a new round configuration and clears
/// every non-admin member's check-in and submission flags.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin or the configuration is invalid
pub async fn start_new_round(
    storage: &dyn Storage,
    admin_id: i64,
    holes_to_play: i64,
    side_to_play: &str,
    tee_color: &str,
) -> Result<LeagueSettings, LeagueError> {
    require_admin(storage, admin_id).await?;
    let config = RoundConfiguration::from_settings(holes_to_play, side_to_play, tee_color)
        .inspect_err(|e| warn!(admin_id, "new round rejected: {e}"))?;

    let current = storage.get_settings().await?;
    let settings = LeagueSettings::new(current.current_week + 1, &config);
    storage.save_settings(&settings).await?;
    storage.reset_round_flags().await?;
    info!(
        admin_id,
        week = settings.current_week,
        round = %config.label(),
        tee = config.tee(),
        "new round started"
    );
    Ok(settings)
}

/// Pairs `member_id` with `partner_id` for the week, replacing any earlier
/// pairing either had. `None` only removes the member's pairing.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin, a member does not exist, or
/// a member is paired with themselves
pub async fn set_pairing(
    storage: &dyn Storage,
    admin_id: i64,
    week_number: i64,
    member_id: i64,
    partner_id: Option<i64>,
) -> Result<(), LeagueError> {
    require_admin(storage, admin_id).await?;
    storage.get_member(member_id).await?;
    if let Some(partner_id) = partner_id {
        if partner_id == member_id {
            return Err(LeagueError::Validation(
                "a member cannot be paired with themselves".to_string(),
            ));
        }
        storage.get_member(partner_id).await?;
    }
    storage
        .set_pairing(week_number, member_id, partner_id)
        .await?;
    info!(admin_id, week_number, member_id, ?partner_id, "pairing set");
    Ok(())
}

/// Flips a member's checked-in flag and returns the new value.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin or the member does not exist
pub async fn toggle_check_in(
    storage: &dyn Storage,
    admin_id: i64,
    member_id: i64,
) -> Result<bool, LeagueError> {
    require_admin(storage, admin_id).await?;
    let member = storage.get_member(member_id).await?;
    let checked_in = !member.is_checked_in;
    storage
        .update_member(member_id, MemberUpdate::CheckedIn(checked_in))
        .await?;
    info!(admin_id, member_id, checked_in, "check-in toggled");
    Ok(checked_in)
}

/// # Errors
///
/// Will return `Err` if the caller is not an admin or the index is out of range
pub async fn set_handicap(
    storage: &dyn Storage,
    admin_id: i64,
    member_id: i64,
    handicap_index: f64,
) -> Result<(), LeagueError> {
    require_admin(storage, admin_id).await?;
    if !handicap_index.is_finite() || !HANDICAP_INDEX_RANGE.contains(&handicap_index) {
        return Err(LeagueError::Validation(format!(
            "handicap index {handicap_index} is outside {} to {}",
            HANDICAP_INDEX_RANGE.start(),
            HANDICAP_INDEX_RANGE.end()
        )));
    }
    storage
        .update_member(member_id, MemberUpdate::HandicapIndex(handicap_index))
        .await?;
    info!(admin_id, member_id, handicap_index, "handicap index set");
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the caller is not an admin or the member does not exist
pub async fn set_flight(
    storage: &dyn Storage,
    admin_id: i64,
    member_id: i64,
    flight: Flight,
) -> Result<(), LeagueError> {
    require_admin(storage, admin_id).await?;
    storage
        .update_member(member_id, MemberUpdate::Flight(flight))
        .await?;
    info!(admin_id, member_id, %flight, "flight set");
    Ok(())
}

/// Records `amount` as the week's winnings on the member's card and credits the
/// difference from any earlier amount to their wallet.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin, the amount is negative, or
/// the member has no card for the week
pub async fn credit_winnings(
    storage: &dyn Storage,
    admin_id: i64,
    member_id: i64,
    week_number: i64,
    amount: f64,
) -> Result<f64, LeagueError> {
    require_admin(storage, admin_id).await?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(LeagueError::Validation(format!(
            "winnings must be zero or more, got {amount}"
        )));
    }
    let card = storage
        .get_scorecard(member_id, week_number)
        .await?
        .ok_or_else(|| {
            LeagueError::NotFound(format!(
                "scorecard for member {member_id} in week {week_number}"
            ))
        })?;

    let delta = amount - card.winnings;
    storage.set_scorecard_winnings(card.id, amount).await?;
    storage
        .update_member(member_id, MemberUpdate::CreditWallet(delta))
        .await?;
    let balance = storage.get_member(member_id).await?.wallet_balance;
    info!(admin_id, member_id, week_number, amount, balance, "winnings credited");
    Ok(balance)
}

/// # Errors
///
/// Will return `Err` if the caller is not an admin or the course fails validation
pub async fn add_course(
    storage: &dyn Storage,
    admin_id: i64,
    course: &NewCourse,
) -> Result<i64, LeagueError> {
    require_admin(storage, admin_id).await?;
    course.validate()?;
    let id = storage.insert_course(course).await?;
    info!(admin_id, course_id = id, name = %course.name, "course added");
    Ok(id)
}

/// Opens or closes scoring on a course.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin or the course does not exist
pub async fn set_scoring_open(
    storage: &dyn Storage,
    admin_id: i64,
    course_id: i64,
    is_open: bool,
) -> Result<(), LeagueError> {
    require_admin(storage, admin_id).await?;
    storage.set_course_open(course_id, is_open).await?;
    info!(admin_id, course_id, is_open, "course scoring toggled");
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the caller is not an admin or the week fails validation
pub async fn update_schedule_week(
    storage: &dyn Storage,
    admin_id: i64,
    week: &ScheduleWeek,
) -> Result<(), LeagueError> {
    require_admin(storage, admin_id).await?;
    if week.week_number < 1 {
        return Err(LeagueError::Validation(format!(
            "week number must be 1 or more, got {}",
            week.week_number
        )));
    }
    week.validate()?;
    storage.upsert_schedule_week(week).await?;
    info!(admin_id, week = week.week_number, game = %week.game_name, "schedule updated");
    Ok(())
}

/// Every member with their card, partner and round status for the week.
///
/// # Errors
///
/// Will return `Err` if the caller is not an admin or the database query fails
pub async fn tournament_ops(
    storage: &dyn Storage,
    admin_id: i64,
    week_number: i64,
) -> Result<Vec<TournamentOpsRow>, LeagueError> {
    require_admin(storage, admin_id).await?;
    let members = storage.list_members().await?;
    let cards = storage.list_scorecards_for_week(week_number).await?;
    let pairings = storage.get_pairings(week_number).await?;

    let card_for = |member_id: i64| cards.iter().find(|c| c.member_id == member_id);

    Ok(members
        .iter()
        .map(|member| {
            let partner_id = find_partner(&pairings, member.id);
            let scorecard = card_for(member.id).cloned();
            let partner_has_card = partner_id.and_then(|id| card_for(id)).is_some();
            TournamentOpsRow {
                status: PlayerRoundStatus::derive(member, scorecard.as_ref(), partner_has_card),
                partner: partner_id.and_then(|id| members.iter().find(|m| m.id == id).cloned()),
                member: member.clone(),
                scorecard,
            }
        })
        .collect())
}
