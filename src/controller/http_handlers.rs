use actix_web::http::{StatusCode, header};
use actix_web::web::{self, Data};
use actix_web::{HttpResponse, Responder};
use maud::Markup;
use serde_json::json;
use std::collections::HashMap;
use tracing::error;

use crate::controller::cache::StandingsCache;
use crate::controller::{admin, league};
use crate::error::LeagueError;
use crate::model::{Flight, NewCourse, ScheduleWeek};
use crate::scoring::{HOLE_COUNT, HoleScores, NetScoreCalculator};
use crate::storage::{SqlStorage, Storage};
use crate::view;

type Params = HashMap<String, String>;

fn get_param_str<'a>(query: &'a Params, key: &str) -> &'a str {
    query.get(key).map_or("", |s| s.trim())
}

fn parse_id(query: &Params, key: &str) -> Result<i64, LeagueError> {
    get_param_str(query, key)
        .parse()
        .map_err(|_| LeagueError::Validation(format!("{key} parameter is required")))
}

fn parse_optional_id(query: &Params, key: &str) -> Result<Option<i64>, LeagueError> {
    match get_param_str(query, key) {
        "" | "none" => Ok(None),
        _ => parse_id(query, key).map(Some),
    }
}

fn parse_float(query: &Params, key: &str) -> Result<f64, LeagueError> {
    get_param_str(query, key)
        .parse()
        .map_err(|_| LeagueError::Validation(format!("{key} must be a number")))
}

fn wants_json(query: &Params) -> bool {
    match get_param_str(query, "json") {
        "1" => true,
        other => other.parse().unwrap_or(false),
    }
}

/// Reads `h1`..`h18`. Blank or missing holes are 0 (not entered).
///
/// # Errors
///
/// Will return `Err` if a hole holds something other than a whole number
pub fn parse_hole_scores(query: &Params) -> Result<HoleScores, LeagueError> {
    let mut gross = [0; HOLE_COUNT];
    for (idx, slot) in gross.iter_mut().enumerate() {
        let key = format!("h{}", idx + 1);
        let raw = get_param_str(query, &key);
        if !raw.is_empty() {
            *slot = raw.parse().map_err(|_| {
                LeagueError::Validation(format!("hole {} score '{raw}' is not a number", idx + 1))
            })?;
        }
    }
    Ok(gross)
}

fn parse_hole_list(query: &Params, key: &str) -> Result<[i32; HOLE_COUNT], LeagueError> {
    let values = get_param_str(query, key)
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<i32>, _>>()?;
    values.try_into().map_err(|v: Vec<i32>| {
        LeagueError::Validation(format!(
            "{key} needs {HOLE_COUNT} comma-separated values, got {}",
            v.len()
        ))
    })
}

fn optional_text(query: &Params, key: &str) -> Option<String> {
    Some(get_param_str(query, key))
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[must_use]
pub fn status_for(err: &LeagueError) -> StatusCode {
    match err {
        LeagueError::Forbidden(_) | LeagueError::NotPartner => StatusCode::FORBIDDEN,
        LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
        LeagueError::ScorecardLocked { .. } => StatusCode::CONFLICT,
        LeagueError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

#[must_use]
pub fn error_response(err: &LeagueError) -> HttpResponse {
    let status = status_for(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("request failed: {err}");
    }
    HttpResponse::build(status).json(json!({"error": err.to_string()}))
}

fn html(markup: Markup) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body(markup.into_string())
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// JSON body for API callers, otherwise a redirect back to the page that posted.
fn done(query: &Params, body: serde_json::Value, location: &str) -> HttpResponse {
    if wants_json(query) {
        HttpResponse::Ok().json(body)
    } else {
        see_other(location)
    }
}

fn ops_location(admin_id: i64, week: i64) -> String {
    format!("/admin/ops?admin={admin_id}&week={week}")
}

async fn current_week(storage: &dyn Storage) -> Result<i64, LeagueError> {
    Ok(storage.get_settings().await?.current_week)
}

async fn week_or_current(storage: &dyn Storage, query: &Params) -> Result<i64, LeagueError> {
    match get_param_str(query, "week") {
        "" => current_week(storage).await,
        _ => parse_id(query, "week"),
    }
}

/// Every page and form endpoint; static files are mounted separately.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(HttpResponse::Ok))
        .route("/standings", web::get().to(standings))
        .route("/enter-score", web::get().to(enter_score_page))
        .route("/enter-score", web::post().to(enter_score_submit))
        .route("/round-summary", web::get().to(round_summary))
        .route("/verify", web::post().to(verify_partner))
        .route("/signup", web::post().to(signup))
        .route("/profile", web::post().to(update_profile))
        .route("/admin/ops", web::get().to(admin_ops))
        .route("/admin/new-round", web::post().to(admin_new_round))
        .route("/admin/verify", web::post().to(admin_verify))
        .route("/admin/paper-scorecard", web::post().to(admin_paper_scorecard))
        .route("/admin/reset", web::post().to(admin_reset))
        .route("/admin/pairing", web::post().to(admin_pairing))
        .route("/admin/check-in", web::post().to(admin_check_in))
        .route("/admin/handicap", web::post().to(admin_handicap))
        .route("/admin/flight", web::post().to(admin_flight))
        .route("/admin/winnings", web::post().to(admin_winnings))
        .route("/admin/course", web::post().to(admin_course))
        .route("/admin/course-open", web::post().to(admin_course_open))
        .route("/admin/schedule", web::post().to(admin_schedule));
}

pub async fn index(storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result = async {
        let settings = storage.get_settings().await?;
        let config = settings.round_configuration()?;
        let course = storage.get_active_course().await.ok();
        let schedule = storage.list_schedule().await?;
        Ok::<_, LeagueError>(view::index::render_index_template(
            &settings,
            &config,
            course.as_ref(),
            &schedule,
        ))
    }
    .await;

    match result {
        Ok(markup) => html(markup),
        Err(e) => error_response(&e),
    }
}

pub async fn standings(
    query: web::Query<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let settings = storage.get_settings().await?;
        let weeks: Vec<i64> = settings.viewable_weeks().collect();
        if get_param_str(&query, "view") == "season" {
            let season = cache.season(storage).await?;
            if wants_json(&query) {
                return Ok(HttpResponse::Ok().json(season));
            }
            return Ok(html(view::standings::render_season_standings(&season, &weeks)));
        }

        let week = week_or_current(storage, &query).await?;
        let weekly = cache.weekly(storage, week).await?;
        if wants_json(&query) {
            return Ok(HttpResponse::Ok().json(json!({"week": week, "flights": weekly})));
        }
        Ok(html(view::standings::render_weekly_standings(
            week, &weekly, &weeks,
        )))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn enter_score_page(
    query: web::Query<Params>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let member_id = parse_id(&query, "member")?;
        let gross = parse_hole_scores(&query)?;
        let preview = league::score_preview(storage, member_id, &gross).await?;
        if wants_json(&query) {
            return Ok(HttpResponse::Ok().json(preview));
        }
        Ok(html(view::score::render_enter_score(&preview, &gross, None)))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn enter_score_submit(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let member_id = match parse_id(&form, "member") {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };
    let gross = match parse_hole_scores(&form) {
        Ok(gross) => gross,
        Err(e) => return error_response(&e),
    };

    match league::submit_scorecard(storage, member_id, &gross).await {
        Ok(card) => {
            if let Err(e) = cache.sync_card(storage, member_id, card.week_number).await {
                error!("standings refresh failed: {e}");
            }
            done(
                &form,
                json!(card),
                &format!(
                    "/round-summary?member={member_id}&week={}",
                    card.week_number
                ),
            )
        }
        Err(e) if e.is_rejection() && !wants_json(&form) => {
            match league::score_preview(storage, member_id, &gross).await {
                Ok(preview) => HttpResponse::build(status_for(&e))
                    .content_type("text/html")
                    .body(
                        view::score::render_enter_score(&preview, &gross, Some(&e.to_string()))
                            .into_string(),
                    ),
                Err(_) => error_response(&e),
            }
        }
        Err(e) => error_response(&e),
    }
}

pub async fn round_summary(
    query: web::Query<Params>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let member_id = parse_id(&query, "member")?;
        let week = week_or_current(storage, &query).await?;
        let member = storage.get_member(member_id).await?;
        let card = storage
            .get_scorecard(member_id, week)
            .await?
            .ok_or_else(|| {
                LeagueError::NotFound(format!("scorecard for member {member_id} in week {week}"))
            })?;
        let course = storage.get_active_course().await?;
        let config = card.round_configuration()?;
        let table = course.allocation()?;
        let result = NetScoreCalculator::new(&table, &config, card.effective_handicap)
            .calculate(&card.hole_scores);

        if wants_json(&query) {
            return Ok(HttpResponse::Ok().json(json!({"scorecard": card, "holes": result})));
        }
        Ok(html(view::score::render_round_summary(
            &member, &card, &course, &config, &result,
        )))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

/// A member attests their partner's card.
pub async fn verify_partner(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let verifier_id = parse_id(&form, "verifier")?;
        let member_id = parse_id(&form, "member")?;
        let week = week_or_current(storage, &form).await?;
        let card = league::verify_scorecard(storage, verifier_id, member_id, week).await?;
        cache.sync_card(storage, member_id, week).await?;
        Ok(done(
            &form,
            json!(card),
            &format!("/round-summary?member={member_id}&week={week}"),
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn signup(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result = league::register_member(
        storage,
        get_param_str(&form, "display_name"),
        get_param_str(&form, "email"),
        Some(get_param_str(&form, "phone_number")),
    )
    .await;

    match result {
        Ok(member) => {
            let location = format!("/enter-score?member={}", member.id);
            done(&form, json!(member), &location)
        }
        Err(e) => error_response(&e),
    }
}

pub async fn update_profile(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let member_id = parse_id(&form, "member")?;
        let member = league::update_profile(
            storage,
            member_id,
            get_param_str(&form, "display_name"),
            Some(get_param_str(&form, "phone_number")),
        )
        .await?;
        cache.invalidate().await;
        Ok(done(&form, json!(member), "/"))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_ops(query: web::Query<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&query, "admin")?;
        let week = week_or_current(storage, &query).await?;
        let rows = admin::tournament_ops(storage, admin_id, week).await?;
        if wants_json(&query) {
            return Ok(HttpResponse::Ok().json(rows));
        }
        Ok(html(view::admin::render_tournament_ops(admin_id, week, &rows)))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_new_round(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let holes = parse_id(&form, "holes")?;
        let settings = admin::start_new_round(
            storage,
            admin_id,
            holes,
            get_param_str(&form, "side"),
            get_param_str(&form, "tee"),
        )
        .await?;
        let location = ops_location(admin_id, settings.current_week);
        Ok(done(&form, json!(settings), &location))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_verify(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let week = week_or_current(storage, &form).await?;
        let card = league::verify_scorecard(storage, admin_id, member_id, week).await?;
        cache.sync_card(storage, member_id, week).await?;
        Ok(done(&form, json!(card), &ops_location(admin_id, week)))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_paper_scorecard(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let gross = parse_hole_scores(&form)?;
        let card = admin::enter_paper_scorecard(storage, admin_id, member_id, &gross).await?;
        cache.sync_card(storage, member_id, card.week_number).await?;
        let location = ops_location(admin_id, card.week_number);
        Ok(done(&form, json!(card), &location))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_reset(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let week = week_or_current(storage, &form).await?;
        admin::reset_scorecard(storage, admin_id, member_id, week).await?;
        cache.sync_card(storage, member_id, week).await?;
        Ok(done(
            &form,
            json!({"reset": true, "member": member_id, "week": week}),
            &ops_location(admin_id, week),
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_pairing(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let partner_id = parse_optional_id(&form, "partner")?;
        let week = week_or_current(storage, &form).await?;
        admin::set_pairing(storage, admin_id, week, member_id, partner_id).await?;
        let pairings = storage.get_pairings(week).await?;
        Ok(done(&form, json!(pairings), &ops_location(admin_id, week)))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_check_in(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let week = week_or_current(storage, &form).await?;
        let checked_in = admin::toggle_check_in(storage, admin_id, member_id).await?;
        Ok(done(
            &form,
            json!({"member": member_id, "is_checked_in": checked_in}),
            &ops_location(admin_id, week),
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_handicap(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let index = parse_float(&form, "handicap_index")?;
        admin::set_handicap(storage, admin_id, member_id, index).await?;
        let week = current_week(storage).await?;
        Ok(done(
            &form,
            json!({"member": member_id, "handicap_index": index}),
            &ops_location(admin_id, week),
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_flight(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
    cache: Data<StandingsCache>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let flight: Flight = get_param_str(&form, "flight").parse()?;
        admin::set_flight(storage, admin_id, member_id, flight).await?;
        cache.invalidate().await;
        let week = current_week(storage).await?;
        Ok(done(
            &form,
            json!({"member": member_id, "flight": flight}),
            &ops_location(admin_id, week),
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_winnings(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let member_id = parse_id(&form, "member")?;
        let week = week_or_current(storage, &form).await?;
        let amount = parse_float(&form, "amount")?;
        let balance = admin::credit_winnings(storage, admin_id, member_id, week, amount).await?;
        Ok(done(
            &form,
            json!({"member": member_id, "wallet_balance": balance}),
            &ops_location(admin_id, week),
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_course(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let course = NewCourse {
            name: get_param_str(&form, "name").to_string(),
            address: optional_text(&form, "address"),
            phone_number: optional_text(&form, "phone_number"),
            website_url: optional_text(&form, "website_url"),
            par_values: parse_hole_list(&form, "par_values")?,
            handicap_values: parse_hole_list(&form, "handicap_values")?,
        };
        let course_id = admin::add_course(storage, admin_id, &course).await?;
        Ok(done(&form, json!({"course_id": course_id}), "/"))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_course_open(
    form: web::Form<Params>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let course_id = parse_id(&form, "course")?;
        let is_open = get_param_str(&form, "open") == "1";
        admin::set_scoring_open(storage, admin_id, course_id, is_open).await?;
        Ok(done(
            &form,
            json!({"course_id": course_id, "is_open": is_open}),
            "/",
        ))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}

pub async fn admin_schedule(form: web::Form<Params>, storage: Data<SqlStorage>) -> impl Responder {
    let storage: &dyn Storage = storage.get_ref();
    let result: Result<HttpResponse, LeagueError> = async {
        let admin_id = parse_id(&form, "admin")?;
        let week = ScheduleWeek {
            id: 0,
            week_number: parse_id(&form, "week")?,
            week_date: optional_text(&form, "week_date"),
            game_name: get_param_str(&form, "game_name").to_string(),
            tee_color: get_param_str(&form, "tee_color").to_string(),
            course_nine: get_param_str(&form, "course_nine").to_string(),
        };
        admin::update_schedule_week(storage, admin_id, &week).await?;
        Ok(done(&form, json!(week), "/"))
    }
    .await;

    result.unwrap_or_else(|e| error_response(&e))
}
