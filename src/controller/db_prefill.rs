use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::LeagueError;
use crate::model::{LeagueSettings, NewCourse, NewMember, ScheduleWeek};
use crate::storage::Storage;

/// Seed file contents. Every section is optional.
///
/// ```json
/// { "settings": { "current_week": 1, "holes_to_play": 9, "tee_color": "White", "side_to_play": "Front" },
///   "courses":  [{ "name": "...", "par_values": [..18], "handicap_values": [..18] }],
///   "members":  [{ "display_name": "...", "email": "...", "flight": "A", "handicap_index": 8.4, "is_admin": false }],
///   "schedule": [{ "week_number": 1, "week_date": "2025-06-03", "game_name": "Chicago", "tee_color": "White", "course_nine": "Front 9" }] }
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct LeagueSeed {
    #[serde(default)]
    pub settings: Option<LeagueSettings>,
    #[serde(default)]
    pub courses: Vec<NewCourse>,
    #[serde(default)]
    pub members: Vec<NewMember>,
    #[serde(default)]
    pub schedule: Vec<ScheduleWeek>,
}

impl LeagueSeed {
    /// # Errors
    ///
    /// Will return `Err` if a course, the settings or a schedule week is invalid
    pub fn validate(&self) -> Result<(), LeagueError> {
        if let Some(settings) = &self.settings {
            settings.round_configuration()?;
        }
        for course in &self.courses {
            course.validate()?;
        }
        for week in &self.schedule {
            week.validate()?;
        }
        Ok(())
    }
}

/// Loads courses, members, settings and schedule from the seed. Courses and
/// members are only inserted into empty tables, so restarting with the same
/// seed does not duplicate them.
///
/// # Errors
///
/// Will return `Err` if the seed does not parse or validate, or a write fails
pub async fn db_prefill(json: &Value, storage: &dyn Storage) -> Result<(), LeagueError> {
    let seed: LeagueSeed = serde_json::from_value(json.clone())?;
    seed.validate()?;

    if let Some(settings) = &seed.settings {
        let config = settings.round_configuration()?;
        storage
            .save_settings(&LeagueSettings::new(settings.current_week, &config))
            .await?;
    }

    if storage.list_courses().await?.is_empty() {
        for course in &seed.courses {
            storage.insert_course(course).await?;
        }
        info!(courses = seed.courses.len(), "courses seeded");
    }

    if storage.list_members().await?.is_empty() {
        for member in &seed.members {
            storage.insert_member(member).await?;
        }
        info!(members = seed.members.len(), "members seeded");
    }

    for week in &seed.schedule {
        storage.upsert_schedule_week(week).await?;
    }
    Ok(())
}
