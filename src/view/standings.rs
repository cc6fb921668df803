use maud::{Markup, html};

use crate::controller::standings::WeeklyStandings;
use crate::model::{Flight, ordinal};
use crate::scoring::SeasonStandingsEntry;
use crate::view::render_layout;

fn render_week_picker(selected: i64, weeks: &[i64]) -> Markup {
    html! {
        form method="get" action="/standings" class="week-picker" {
            input type="hidden" name="view" value="weekly";
            select name="week" onchange="this.form.submit()" {
                @for week in weeks {
                    option value=(week) selected[*week == selected] { "Week " (week) }
                }
            }
        }
    }
}

#[must_use]
pub fn render_weekly_standings(week: i64, standings: &WeeklyStandings, weeks: &[i64]) -> Markup {
    let content = html! {
        h1 { "Weekly Standings" }
        (render_week_picker(week, weeks))
        @if standings.is_empty() {
            p class="empty" { "No verified scorecards for week " (week) " yet." }
        }
        @for (flight, finishes) in standings {
            section class="flight" id=(format!("flight-{flight}")) {
                h2 { "Flight " (flight) }
                table class="styled-table" {
                    thead {
                        tr {
                            th { "Pos" }
                            th { "Player" }
                            th { "Gross" }
                            th { "Net" }
                            th { "Points" }
                        }
                    }
                    tbody {
                        @for finish in finishes {
                            tr {
                                td { (ordinal(finish.position)) }
                                td { (finish.display_name) }
                                td { (finish.gross) }
                                td { (finish.net) }
                                td { (finish.points) }
                            }
                        }
                    }
                }
            }
        }
    };
    render_layout("Weekly Standings", &content)
}

#[must_use]
pub fn render_season_standings(standings: &[SeasonStandingsEntry], weeks: &[i64]) -> Markup {
    let content = html! {
        h1 { "Season Standings" }
        @for flight in Flight::ALL {
            @let entries: Vec<&SeasonStandingsEntry> = standings.iter().filter(|e| e.flight == flight).collect();
            @if !entries.is_empty() {
                section class="flight" id=(format!("flight-{flight}")) {
                    h2 { "Flight " (flight) }
                    table class="styled-table" {
                        thead {
                            tr {
                                th { "Player" }
                                @for week in weeks { th { "Wk " (week) } }
                                th { "Events" }
                                th { "Points" }
                            }
                        }
                        tbody {
                            @for entry in entries {
                                tr {
                                    td { (entry.display_name) }
                                    @for week in weeks {
                                        td {
                                            @if let Some(placing) = entry.weeks.get(week) {
                                                (placing.points)
                                            } @else { "-" }
                                        }
                                    }
                                    td class="events" { (entry.events_played) }
                                    td class="total" { (entry.total_points) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    render_layout("Season Standings", &content)
}
