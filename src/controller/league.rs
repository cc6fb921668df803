use serde::Serialize;
use tracing::{info, warn};

use crate::error::LeagueError;
use crate::model::{
    Course, Member, NewMember, NewScorecard, PhoneNumber, Scorecard, validate_display_name,
};
use crate::scoring::{
    HOLE_COUNT, HoleScores, NetScoreCalculator, NetScorecard, RoundConfiguration, mask_inactive,
};
use crate::storage::{MemberUpdate, Storage};

/// What the score entry page needs: the running net for whatever has been entered so far.
#[derive(Serialize, Debug, Clone)]
pub struct ScorePreview {
    pub member: Member,
    pub course: Course,
    pub config: RoundConfiguration,
    pub week_number: i64,
    pub par: i32,
    /// Strokes received on each hole in play, whether or not it has been entered.
    pub pops: HoleScores,
    pub scorecard: NetScorecard,
    pub already_submitted: bool,
}

/// # Errors
///
/// Will return `Err` if the settings cannot be read or do not form a valid round
pub async fn load_round_configuration(
    storage: &dyn Storage,
) -> Result<RoundConfiguration, LeagueError> {
    storage.get_settings().await?.round_configuration()
}

/// # Errors
///
/// Will return `Err` if the member, course or settings cannot be loaded
pub async fn score_preview(
    storage: &dyn Storage,
    member_id: i64,
    gross: &HoleScores,
) -> Result<ScorePreview, LeagueError> {
    let settings = storage.get_settings().await?;
    let config = settings.round_configuration()?;
    let course = storage.get_active_course().await?;
    let member = storage.get_member(member_id).await?;
    let table = course.allocation()?;

    let calculator = NetScoreCalculator::for_handicap_index(&table, &config, member.handicap_index);
    let mut pops = [0; HOLE_COUNT];
    for i in config.active_holes() {
        pops[i] = calculator.pops(i);
    }
    let scorecard = calculator.calculate(gross);

    Ok(ScorePreview {
        par: course.par_for(&config),
        already_submitted: member.has_submitted_current_round,
        week_number: settings.current_week,
        member,
        course,
        config,
        pops,
        scorecard,
    })
}

/// Scores a complete card for the current week and builds the row to store.
pub(crate) async fn prepare_scorecard(
    storage: &dyn Storage,
    member: &Member,
    gross: &HoleScores,
    is_verified: bool,
) -> Result<NewScorecard, LeagueError> {
    let settings = storage.get_settings().await?;
    let config = settings.round_configuration()?;

    if member.has_submitted_current_round
        || storage
            .get_scorecard(member.id, settings.current_week)
            .await?
            .is_some()
    {
        warn!(
            member_id = member.id,
            week = settings.current_week,
            "scorecard already submitted"
        );
        return Err(LeagueError::ScorecardLocked {
            member_id: member.id,
            week: settings.current_week,
        });
    }

    let course = storage.get_active_course().await?;
    let table = course.allocation()?;
    let result = NetScoreCalculator::for_handicap_index(&table, &config, member.handicap_index)
        .calculate_submission(gross)
        .inspect_err(|e| warn!(member_id = member.id, "scorecard rejected: {e}"))?;

    Ok(NewScorecard {
        member_id: member.id,
        week_number: settings.current_week,
        score: result.total_gross,
        net_score: result.total_net,
        hole_scores: mask_inactive(gross, &config),
        effective_handicap: result.effective_handicap,
        holes_played: config.holes_to_play(),
        tee_played: config.tee().to_string(),
        side_played: config.side_to_play().to_string(),
        is_verified,
    })
}

/// Stores the card and marks the member as done for the week. A concurrent
/// duplicate that slips past the gate is caught by the unique index.
pub(crate) async fn store_scorecard(
    storage: &dyn Storage,
    card: &NewScorecard,
) -> Result<Scorecard, LeagueError> {
    let stored = storage.insert_scorecard(card).await.map_err(|e| {
        if e.to_string().contains("UNIQUE") {
            LeagueError::ScorecardLocked {
                member_id: card.member_id,
                week: card.week_number,
            }
        } else {
            LeagueError::from(e)
        }
    })?;
    storage
        .update_member(card.member_id, MemberUpdate::SubmittedCurrentRound(true))
        .await?;
    Ok(stored)
}

/// A member turns in their own card for the current week.
///
/// # Errors
///
/// Will return `Err` if scoring is closed, the member already has a card this
/// week, an active hole is missing, or the database write fails
pub async fn submit_scorecard(
    storage: &dyn Storage,
    member_id: i64,
    gross: &HoleScores,
) -> Result<Scorecard, LeagueError> {
    let course = storage.get_active_course().await?;
    if !course.is_open {
        warn!(member_id, course = %course.name, "submission while scoring is closed");
        return Err(LeagueError::ScoringClosed);
    }

    let member = storage.get_member(member_id).await?;
    let card = prepare_scorecard(storage, &member, gross, false).await?;
    let stored = store_scorecard(storage, &card).await?;
    info!(
        member_id,
        week = stored.week_number,
        gross = stored.score,
        net = stored.net_score,
        "scorecard submitted"
    );
    Ok(stored)
}

/// Attests a card. The verifier must be the owner's partner for that week, or an admin.
///
/// # Errors
///
/// Will return `Err` if the card does not exist or the verifier may not attest it
pub async fn verify_scorecard(
    storage: &dyn Storage,
    verifier_id: i64,
    member_id: i64,
    week_number: i64,
) -> Result<Scorecard, LeagueError> {
    let verifier = storage.get_member(verifier_id).await?;
    let mut card = storage
        .get_scorecard(member_id, week_number)
        .await?
        .ok_or_else(|| {
            LeagueError::NotFound(format!(
                "scorecard for member {member_id} in week {week_number}"
            ))
        })?;

    if !verifier.is_admin {
        let pairings = storage.get_pairings(week_number).await?;
        let is_partner = verifier_id != member_id
            && crate::model::find_partner(&pairings, member_id) == Some(verifier_id);
        if !is_partner {
            warn!(verifier_id, member_id, week_number, "verification refused");
            return Err(LeagueError::NotPartner);
        }
    }

    if !card.is_verified {
        storage.set_scorecard_verified(card.id).await?;
        card.is_verified = true;
        info!(
            verifier_id,
            member_id,
            week_number,
            admin_override = verifier.is_admin,
            "scorecard verified"
        );
    }
    Ok(card)
}

/// # Errors
///
/// Will return `Err` if the name is blank, the phone number is malformed, or the member does not exist
pub async fn update_profile(
    storage: &dyn Storage,
    member_id: i64,
    display_name: &str,
    phone_number: Option<&str>,
) -> Result<Member, LeagueError> {
    let display_name = validate_display_name(display_name)?;
    let phone_number = normalize_phone(phone_number)?;
    storage
        .update_member(
            member_id,
            MemberUpdate::Profile {
                display_name,
                phone_number,
            },
        )
        .await?;
    Ok(storage.get_member(member_id).await?)
}

/// Signs a new member up in flight D with a zero handicap index.
///
/// # Errors
///
/// Will return `Err` if the name, email or phone number is invalid, or the email is taken
pub async fn register_member(
    storage: &dyn Storage,
    display_name: &str,
    email: &str,
    phone_number: Option<&str>,
) -> Result<Member, LeagueError> {
    let display_name = validate_display_name(display_name)?;
    let email = email.trim();
    if email.len() < 3 || !email.contains('@') {
        return Err(LeagueError::Validation(format!(
            "'{email}' is not an email address"
        )));
    }
    let phone_number = normalize_phone(phone_number)?;

    let mut new_member = NewMember::signup(&display_name, email, None);
    new_member.phone_number = phone_number;
    let id = storage.insert_member(&new_member).await.map_err(|e| {
        if e.to_string().contains("UNIQUE") {
            LeagueError::Validation(format!("{} is already registered", new_member.email))
        } else {
            LeagueError::from(e)
        }
    })?;
    info!(member_id = id, "member registered");
    Ok(storage.get_member(id).await?)
}

fn normalize_phone(phone_number: Option<&str>) -> Result<Option<String>, LeagueError> {
    match phone_number.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Ok(Some(PhoneNumber::try_from(p)?.value().to_string())),
        None => Ok(None),
    }
}
