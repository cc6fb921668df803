use maud::{Markup, html};

use crate::model::{Course, LeagueSettings, ScheduleWeek};
use crate::scoring::RoundConfiguration;
use crate::view::render_layout;

pub const DEFAULT_INDEX_TITLE: &str = "Golf League";

#[must_use]
pub fn render_index_template(
    settings: &LeagueSettings,
    config: &RoundConfiguration,
    course: Option<&Course>,
    schedule: &[ScheduleWeek],
) -> Markup {
    let content = html! {
        h1 { (DEFAULT_INDEX_TITLE) }
        section id="this-week" {
            h2 { "Week " (settings.current_week) }
            p class="round" { (config.label()) " from the " (config.tee()) " tees" }
            @if let Some(course) = course {
                p class="course" {
                    (course.name)
                    @if !course.is_open { " (scoring closed)" }
                }
            }
        }
        @if !schedule.is_empty() {
            section id="schedule" {
                h2 { "Schedule" }
                table class="styled-table" {
                    thead {
                        tr {
                            th { "Week" }
                            th { "Date" }
                            th { "Game" }
                            th { "Nine" }
                            th { "Tees" }
                        }
                    }
                    tbody {
                        @for week in schedule {
                            tr class=[(week.week_number == settings.current_week).then_some("current")] {
                                td { (week.week_number) }
                                td { (week.display_date()) }
                                td { (week.game_name) }
                                td { (week.course_nine) }
                                td { (week.tee_color) }
                            }
                        }
                    }
                }
            }
        }
    };
    render_layout(DEFAULT_INDEX_TITLE, &content)
}
