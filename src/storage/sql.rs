use async_trait::async_trait;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, RowValues};

use crate::model::{
    Course, LeagueSettings, Member, NewCourse, NewMember, NewScorecard, Pairing, ScheduleWeek,
    Scorecard,
};
use crate::scoring::{CardResult, HOLE_COUNT};
use crate::storage::{MemberUpdate, Storage, StorageError};

impl From<SqlMiddlewareDbError> for StorageError {
    fn from(err: SqlMiddlewareDbError) -> Self {
        StorageError::new(err.to_string())
    }
}

#[derive(Clone)]
pub struct SqlStorage {
    config_and_pool: ConfigAndPool,
}

impl SqlStorage {
    #[must_use]
    pub fn new(config_and_pool: ConfigAndPool) -> Self {
        Self { config_and_pool }
    }

    #[must_use]
    pub fn config_and_pool(&self) -> &ConfigAndPool {
        &self.config_and_pool
    }

    /// Runs a semicolon-separated script, e.g. the schema or a startup script.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database query fails
    pub async fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        let mut conn = self.config_and_pool.get_connection().await?;
        conn.execute_batch(sql).await?;
        Ok(())
    }

    /// Creates every league table that does not exist yet.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database query fails
    pub async fn create_schema(&self) -> Result<(), StorageError> {
        self.execute_batch(&schema_script()).await
    }

    async fn select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Vec<CustomDbRow>, StorageError> {
        let mut conn = self.config_and_pool.get_connection().await?;
        let result = conn.query(query).params(params).select().await?;
        Ok(result.results)
    }

    async fn dml(&self, query: &str, params: &[RowValues]) -> Result<usize, StorageError> {
        let mut conn = self.config_and_pool.get_connection().await?;
        Ok(conn.query(query).params(params).dml().await?)
    }
}

/// The full `CREATE TABLE` script, in dependency order.
#[must_use]
pub fn schema_script() -> String {
    [
        include_str!("../sql/schema/sqlite/01_league_settings.sql"),
        include_str!("../sql/schema/sqlite/02_course.sql"),
        include_str!("../sql/schema/sqlite/03_member.sql"),
        include_str!("../sql/schema/sqlite/04_scorecard.sql"),
        include_str!("../sql/schema/sqlite/05_pairing.sql"),
        include_str!("../sql/schema/sqlite/06_schedule_week.sql"),
    ]
    .join("\n")
}

/// Drops every league table.
#[must_use]
pub fn drop_script() -> &'static str {
    include_str!("../sql/schema/sqlite/00_table_drop.sql")
}

fn get_int(row: &CustomDbRow, field: &str) -> Result<i64, StorageError> {
    row.get(field)
        .and_then(|v| v.as_int())
        .copied()
        .ok_or_else(|| StorageError::new(format!("column {field} missing or not an integer")))
}

fn get_i32(row: &CustomDbRow, field: &str) -> Result<i32, StorageError> {
    let value = get_int(row, field)?;
    i32::try_from(value).map_err(|e| StorageError::new(format!("column {field}: {e}")))
}

#[allow(clippy::cast_precision_loss)]
fn get_float(row: &CustomDbRow, field: &str) -> Result<f64, StorageError> {
    let value = row
        .get(field)
        .ok_or_else(|| StorageError::new(format!("column {field} missing")))?;
    value
        .as_float()
        .or_else(|| value.as_int().map(|i| *i as f64))
        .ok_or_else(|| StorageError::new(format!("column {field} is not a number")))
}

fn get_bool(row: &CustomDbRow, field: &str) -> Result<bool, StorageError> {
    Ok(get_int(row, field)? != 0)
}

fn get_text(row: &CustomDbRow, field: &str) -> Result<String, StorageError> {
    get_opt_text(row, field)
        .ok_or_else(|| StorageError::new(format!("column {field} missing or not text")))
}

fn get_opt_text(row: &CustomDbRow, field: &str) -> Option<String> {
    row.get(field)
        .and_then(|v| v.as_text())
        .map(ToString::to_string)
}

fn get_holes(row: &CustomDbRow, field: &str) -> Result<[i32; HOLE_COUNT], StorageError> {
    let json_text = get_text(row, field)?;
    let values: Vec<i32> = serde_json::from_str(&json_text)
        .map_err(|e| StorageError::new(format!("Failed to parse {field} field: {e}")))?;
    values.try_into().map_err(|v: Vec<i32>| {
        StorageError::new(format!(
            "{field} has {} values, expected {HOLE_COUNT}",
            v.len()
        ))
    })
}

fn holes_json(values: &[i32; HOLE_COUNT]) -> Result<String, StorageError> {
    serde_json::to_string(values)
        .map_err(|e| StorageError::new(format!("Failed to serialize hole values: {e}")))
}

fn opt_text_param(value: Option<&String>) -> RowValues {
    value.map_or(RowValues::Null, |v| RowValues::Text(v.clone()))
}

fn course_from_row(row: &CustomDbRow) -> Result<Course, StorageError> {
    Ok(Course {
        id: get_int(row, "id")?,
        name: get_text(row, "name")?,
        address: get_opt_text(row, "address"),
        phone_number: get_opt_text(row, "phone_number"),
        website_url: get_opt_text(row, "website_url"),
        par_values: get_holes(row, "par_values")?,
        handicap_values: get_holes(row, "handicap_values")?,
        is_open: get_bool(row, "is_open")?,
    })
}

fn member_from_row(row: &CustomDbRow) -> Result<Member, StorageError> {
    Ok(Member {
        id: get_int(row, "id")?,
        display_name: get_text(row, "display_name")?,
        email: get_text(row, "email")?,
        phone_number: get_opt_text(row, "phone_number"),
        flight: get_text(row, "flight")?
            .parse()
            .map_err(|e: crate::error::LeagueError| StorageError::new(e.to_string()))?,
        handicap_index: get_float(row, "handicap_index")?,
        is_admin: get_bool(row, "is_admin")?,
        is_checked_in: get_bool(row, "is_checked_in")?,
        has_submitted_current_round: get_bool(row, "has_submitted_current_round")?,
        wallet_balance: get_float(row, "wallet_balance")?,
    })
}

fn scorecard_from_row(row: &CustomDbRow) -> Result<Scorecard, StorageError> {
    Ok(Scorecard {
        id: get_int(row, "id")?,
        member_id: get_int(row, "member_id")?,
        week_number: get_int(row, "week_number")?,
        score: get_i32(row, "score")?,
        net_score: get_i32(row, "net_score")?,
        hole_scores: get_holes(row, "hole_scores")?,
        effective_handicap: get_i32(row, "effective_handicap")?,
        holes_played: get_int(row, "holes_played")?,
        tee_played: get_text(row, "tee_played")?,
        side_played: get_text(row, "side_played")?,
        is_verified: get_bool(row, "is_verified")?,
        winnings: get_float(row, "winnings")?,
        created_at: row.get("ins_ts").and_then(|v| {
            v.as_text()
                .map(ToString::to_string)
                .or_else(|| v.as_timestamp().map(|ts| ts.to_string()))
        }),
    })
}

fn card_result_from_row(row: &CustomDbRow) -> Result<CardResult, StorageError> {
    Ok(CardResult {
        member_id: get_int(row, "member_id")?,
        display_name: get_text(row, "display_name")?,
        flight: get_text(row, "flight")?
            .parse()
            .map_err(|e: crate::error::LeagueError| StorageError::new(e.to_string()))?,
        week_number: get_int(row, "week_number")?,
        gross: get_i32(row, "score")?,
        net: get_i32(row, "net_score")?,
        is_verified: get_bool(row, "is_verified")?,
    })
}

#[async_trait]
impl Storage for SqlStorage {
    async fn get_settings(&self) -> Result<LeagueSettings, StorageError> {
        let rows = self
            .select(include_str!("../sql/functions/sqlite/01_sp_get_settings.sql"), &[])
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| StorageError::not_found("league settings"))?;
        Ok(LeagueSettings {
            current_week: get_int(row, "current_week")?,
            holes_to_play: get_int(row, "holes_to_play")?,
            tee_color: get_text(row, "tee_color")?,
            side_to_play: get_text(row, "side_to_play")?,
        })
    }

    async fn save_settings(&self, settings: &LeagueSettings) -> Result<(), StorageError> {
        let params = [
            RowValues::Int(settings.current_week),
            RowValues::Int(settings.holes_to_play),
            RowValues::Text(settings.tee_color.clone()),
            RowValues::Text(settings.side_to_play.clone()),
        ];
        self.dml(
            include_str!("../sql/functions/sqlite/02_sp_set_settings.sql"),
            &params,
        )
        .await?;
        Ok(())
    }

    async fn get_active_course(&self) -> Result<Course, StorageError> {
        self.list_courses()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::not_found("course"))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        self.select(include_str!("../sql/functions/sqlite/03_sp_get_courses.sql"), &[])
            .await?
            .iter()
            .map(course_from_row)
            .collect()
    }

    async fn insert_course(&self, course: &NewCourse) -> Result<i64, StorageError> {
        let params = [
            RowValues::Text(course.name.trim().to_string()),
            opt_text_param(course.address.as_ref()),
            opt_text_param(course.phone_number.as_ref()),
            opt_text_param(course.website_url.as_ref()),
            RowValues::Text(holes_json(&course.par_values)?),
            RowValues::Text(holes_json(&course.handicap_values)?),
        ];
        self.dml(
            include_str!("../sql/functions/sqlite/04_sp_insert_course.sql"),
            &params,
        )
        .await?;
        let rows = self
            .select(
                "SELECT max(id) AS id FROM course WHERE name = ?1;",
                &[RowValues::Text(course.name.trim().to_string())],
            )
            .await?;
        rows.first()
            .map(|row| get_int(row, "id"))
            .unwrap_or_else(|| Err(StorageError::new("inserted course not found")))
    }

    async fn set_course_open(&self, course_id: i64, is_open: bool) -> Result<(), StorageError> {
        let updated = self
            .dml(
                "UPDATE course SET is_open = ?2 WHERE id = ?1;",
                &[RowValues::Int(course_id), RowValues::Int(i64::from(is_open))],
            )
            .await?;
        if updated == 0 {
            return Err(StorageError::not_found(format!("course {course_id}")));
        }
        Ok(())
    }

    async fn get_member(&self, member_id: i64) -> Result<Member, StorageError> {
        let rows = self
            .select(
                include_str!("../sql/functions/sqlite/06_sp_get_member.sql"),
                &[RowValues::Int(member_id)],
            )
            .await?;
        rows.first()
            .map(member_from_row)
            .unwrap_or_else(|| Err(StorageError::not_found(format!("member {member_id}"))))
    }

    async fn list_members(&self) -> Result<Vec<Member>, StorageError> {
        self.select(include_str!("../sql/functions/sqlite/05_sp_get_members.sql"), &[])
            .await?
            .iter()
            .map(member_from_row)
            .collect()
    }

    async fn insert_member(&self, member: &NewMember) -> Result<i64, StorageError> {
        let params = [
            RowValues::Text(member.display_name.clone()),
            RowValues::Text(member.email.clone()),
            opt_text_param(member.phone_number.as_ref()),
            RowValues::Text(member.flight.to_string()),
            RowValues::Float(member.handicap_index),
            RowValues::Int(i64::from(member.is_admin)),
        ];
        self.dml(
            include_str!("../sql/functions/sqlite/07_sp_insert_member.sql"),
            &params,
        )
        .await?;
        let rows = self
            .select(
                "SELECT id FROM member WHERE email = ?1;",
                &[RowValues::Text(member.email.clone())],
            )
            .await?;
        rows.first()
            .map(|row| get_int(row, "id"))
            .unwrap_or_else(|| Err(StorageError::new("inserted member not found")))
    }

    async fn update_member(
        &self,
        member_id: i64,
        update: MemberUpdate,
    ) -> Result<(), StorageError> {
        let id = RowValues::Int(member_id);
        let (query, params) = match update {
            MemberUpdate::Profile {
                display_name,
                phone_number,
            } => (
                "UPDATE member SET display_name = ?2, phone_number = ?3 WHERE id = ?1;",
                vec![
                    id,
                    RowValues::Text(display_name),
                    opt_text_param(phone_number.as_ref()),
                ],
            ),
            MemberUpdate::HandicapIndex(index) => (
                "UPDATE member SET handicap_index = ?2 WHERE id = ?1;",
                vec![id, RowValues::Float(index)],
            ),
            MemberUpdate::Flight(flight) => (
                "UPDATE member SET flight = ?2 WHERE id = ?1;",
                vec![id, RowValues::Text(flight.to_string())],
            ),
            MemberUpdate::CheckedIn(checked_in) => (
                "UPDATE member SET is_checked_in = ?2 WHERE id = ?1;",
                vec![id, RowValues::Int(i64::from(checked_in))],
            ),
            MemberUpdate::SubmittedCurrentRound(submitted) => (
                "UPDATE member SET has_submitted_current_round = ?2 WHERE id = ?1;",
                vec![id, RowValues::Int(i64::from(submitted))],
            ),
            MemberUpdate::CreditWallet(amount) => (
                "UPDATE member SET wallet_balance = wallet_balance + ?2 WHERE id = ?1;",
                vec![id, RowValues::Float(amount)],
            ),
        };
        if self.dml(query, &params).await? == 0 {
            return Err(StorageError::not_found(format!("member {member_id}")));
        }
        Ok(())
    }

    async fn reset_round_flags(&self) -> Result<(), StorageError> {
        self.dml(
            include_str!("../sql/functions/sqlite/16_sp_reset_round_flags.sql"),
            &[],
        )
        .await?;
        Ok(())
    }

    async fn get_scorecard(
        &self,
        member_id: i64,
        week_number: i64,
    ) -> Result<Option<Scorecard>, StorageError> {
        let rows = self
            .select(
                include_str!("../sql/functions/sqlite/08_sp_get_scorecard.sql"),
                &[RowValues::Int(member_id), RowValues::Int(week_number)],
            )
            .await?;
        rows.first().map(scorecard_from_row).transpose()
    }

    async fn list_scorecards_for_week(
        &self,
        week_number: i64,
    ) -> Result<Vec<Scorecard>, StorageError> {
        self.select(
            include_str!("../sql/functions/sqlite/09_sp_get_week_scorecards.sql"),
            &[RowValues::Int(week_number)],
        )
        .await?
        .iter()
        .map(scorecard_from_row)
        .collect()
    }

    async fn insert_scorecard(&self, card: &NewScorecard) -> Result<Scorecard, StorageError> {
        let params = [
            RowValues::Int(card.member_id),
            RowValues::Int(card.week_number),
            RowValues::Int(i64::from(card.score)),
            RowValues::Int(i64::from(card.net_score)),
            RowValues::Text(holes_json(&card.hole_scores)?),
            RowValues::Int(i64::from(card.effective_handicap)),
            RowValues::Int(card.holes_played),
            RowValues::Text(card.tee_played.clone()),
            RowValues::Text(card.side_played.clone()),
            RowValues::Int(i64::from(card.is_verified)),
        ];
        self.dml(
            include_str!("../sql/functions/sqlite/10_sp_insert_scorecard.sql"),
            &params,
        )
        .await?;
        self.get_scorecard(card.member_id, card.week_number)
            .await?
            .ok_or_else(|| StorageError::new("inserted scorecard not found"))
    }

    async fn set_scorecard_verified(&self, scorecard_id: i64) -> Result<(), StorageError> {
        let updated = self
            .dml(
                "UPDATE scorecard SET is_verified = 1 WHERE id = ?1;",
                &[RowValues::Int(scorecard_id)],
            )
            .await?;
        if updated == 0 {
            return Err(StorageError::not_found(format!("scorecard {scorecard_id}")));
        }
        Ok(())
    }

    async fn set_scorecard_winnings(
        &self,
        scorecard_id: i64,
        winnings: f64,
    ) -> Result<(), StorageError> {
        let updated = self
            .dml(
                "UPDATE scorecard SET winnings = ?2 WHERE id = ?1;",
                &[RowValues::Int(scorecard_id), RowValues::Float(winnings)],
            )
            .await?;
        if updated == 0 {
            return Err(StorageError::not_found(format!("scorecard {scorecard_id}")));
        }
        Ok(())
    }

    async fn delete_scorecard(
        &self,
        member_id: i64,
        week_number: i64,
    ) -> Result<bool, StorageError> {
        let deleted = self
            .dml(
                "DELETE FROM scorecard WHERE member_id = ?1 AND week_number = ?2;",
                &[RowValues::Int(member_id), RowValues::Int(week_number)],
            )
            .await?;
        Ok(deleted > 0)
    }

    async fn list_card_results(&self) -> Result<Vec<CardResult>, StorageError> {
        self.select(
            include_str!("../sql/functions/sqlite/11_sp_get_card_results.sql"),
            &[],
        )
        .await?
        .iter()
        .map(card_result_from_row)
        .collect()
    }

    async fn get_pairings(&self, week_number: i64) -> Result<Vec<Pairing>, StorageError> {
        self.select(
            include_str!("../sql/functions/sqlite/12_sp_get_pairings.sql"),
            &[RowValues::Int(week_number)],
        )
        .await?
        .iter()
        .map(|row| {
            Ok(Pairing {
                week_number: get_int(row, "week_number")?,
                player_1_id: get_int(row, "player_1_id")?,
                player_2_id: get_int(row, "player_2_id")?,
            })
        })
        .collect()
    }

    async fn set_pairing(
        &self,
        week_number: i64,
        member_id: i64,
        partner_id: Option<i64>,
    ) -> Result<(), StorageError> {
        self.dml(
            include_str!("../sql/functions/sqlite/13_sp_delete_member_pairing.sql"),
            &[
                RowValues::Int(week_number),
                RowValues::Int(member_id),
                RowValues::Int(partner_id.unwrap_or(member_id)),
            ],
        )
        .await?;
        if let Some(partner_id) = partner_id {
            self.dml(
                "INSERT INTO pairing (week_number, player_1_id, player_2_id) VALUES (?1, ?2, ?3);",
                &[
                    RowValues::Int(week_number),
                    RowValues::Int(member_id),
                    RowValues::Int(partner_id),
                ],
            )
            .await?;
        }
        Ok(())
    }

    async fn list_schedule(&self) -> Result<Vec<ScheduleWeek>, StorageError> {
        self.select(include_str!("../sql/functions/sqlite/14_sp_get_schedule.sql"), &[])
            .await?
            .iter()
            .map(|row| {
                Ok(ScheduleWeek {
                    id: get_int(row, "id")?,
                    week_number: get_int(row, "week_number")?,
                    week_date: get_opt_text(row, "week_date"),
                    game_name: get_text(row, "game_name")?,
                    tee_color: get_text(row, "tee_color")?,
                    course_nine: get_text(row, "course_nine")?,
                })
            })
            .collect()
    }

    async fn upsert_schedule_week(&self, week: &ScheduleWeek) -> Result<(), StorageError> {
        let params = [
            RowValues::Int(week.week_number),
            opt_text_param(week.week_date.as_ref()),
            RowValues::Text(week.game_name.clone()),
            RowValues::Text(week.tee_color.clone()),
            RowValues::Text(week.course_nine.clone()),
        ];
        self.dml(
            include_str!("../sql/functions/sqlite/15_sp_upsert_schedule_week.sql"),
            &params,
        )
        .await?;
        Ok(())
    }
}

