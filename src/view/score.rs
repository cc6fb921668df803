use maud::{Markup, html};

use crate::controller::league::ScorePreview;
use crate::model::{Course, Member, Scorecard, format_currency};
use crate::scoring::{HoleScores, NetScorecard, RoundConfiguration};
use crate::view::{render_error, render_layout};

/// One "•" per handicap stroke on a hole.
#[must_use]
pub fn pop_marker(pops: i32) -> String {
    "•".repeat(usize::try_from(pops).unwrap_or_default())
}

#[must_use]
pub fn render_enter_score(
    preview: &ScorePreview,
    gross: &HoleScores,
    error: Option<&str>,
) -> Markup {
    let holes: Vec<usize> = preview.config.active_holes().collect();
    let content = html! {
        h1 { "Enter Score" }
        p class="round-info" {
            (preview.member.display_name) " · Week " (preview.week_number) " · "
            (preview.config.label()) " · " (preview.config.tee()) " tees · Hcp "
            (preview.scorecard.effective_handicap)
        }
        @if let Some(message) = error { (render_error(message)) }
        @if preview.already_submitted {
            p class="submitted" {
                "Your scorecard for week " (preview.week_number) " has been submitted. "
                a href=(format!("/round-summary?member={}&week={}", preview.member.id, preview.week_number)) {
                    "View round summary"
                }
            }
        } @else if !preview.course.is_open {
            p class="closed" { "Scoring is closed at " (preview.course.name) "." }
        } @else {
            form id="score-entry" method="post" action="/enter-score" {
                input type="hidden" name="member" value=(preview.member.id);
                table class="styled-table scorecard" {
                    thead {
                        tr {
                            th { "Hole" }
                            @for i in &holes { th { (i + 1) } }
                        }
                    }
                    tbody {
                        tr class="par" {
                            td { "Par" }
                            @for i in &holes { td { (preview.course.par_values[*i]) } }
                        }
                        tr class="pops" {
                            td { "Strokes" }
                            @for i in &holes {
                                td { (pop_marker(preview.pops[*i])) }
                            }
                        }
                        tr class="gross" {
                            td { "Score" }
                            @for i in &holes {
                                td {
                                    input type="number" min="1" max="15" name=(format!("h{}", i + 1))
                                        value=[(gross[*i] > 0).then_some(gross[*i])];
                                }
                            }
                        }
                    }
                }
                p class="totals" {
                    "Par " (preview.par) " · Gross " span id="total-gross" { (preview.scorecard.total_gross) }
                    " · Net " span id="total-net" { (preview.scorecard.total_net) }
                }
                button type="submit" { "Submit Scorecard" }
            }
        }
    };
    render_layout("Enter Score", &content)
}

#[must_use]
pub fn render_round_summary(
    member: &Member,
    card: &Scorecard,
    course: &Course,
    config: &RoundConfiguration,
    result: &NetScorecard,
) -> Markup {
    let holes: Vec<usize> = config.active_holes().collect();
    let content = html! {
        h1 { "Round Summary" }
        p class="round-info" {
            (member.display_name) " · Week " (card.week_number) " · " (course.name) " · "
            (config.label()) " · " (card.tee_played) " tees"
        }
        table class="styled-table scorecard" id="round-summary" {
            thead {
                tr {
                    th { "Hole" }
                    @for i in &holes { th { (i + 1) } }
                    th { "Total" }
                }
            }
            tbody {
                tr class="par" {
                    td { "Par" }
                    @for i in &holes { td { (course.par_values[*i]) } }
                    td { (course.par_for(config)) }
                }
                tr class="handicap" {
                    td { "Hdcp" }
                    @for i in &holes { td { (course.handicap_values[*i]) } }
                    td {}
                }
                tr class="gross" {
                    td { "Score" }
                    @for i in &holes { td { (card.hole_scores[*i]) } }
                    td { (card.score) }
                }
                tr class="pops" {
                    td { "Strokes" }
                    @for i in &holes {
                        td { (result.hole(i + 1).map(|h| pop_marker(h.pops)).unwrap_or_default()) }
                    }
                    td { (result.total_pops) }
                }
                tr class="net" {
                    td { "Net" }
                    @for i in &holes {
                        td { (result.hole(i + 1).map(|h| h.net).unwrap_or_default()) }
                    }
                    td { (card.net_score) }
                }
            }
        }
        @if !config.is_nine() {
            p class="splits" { "Out " (result.out_gross) " · In " (result.in_gross) }
        }
        p class="status" {
            @if card.is_verified { "Verified" } @else { "Awaiting partner verification" }
            @if card.winnings > 0.0 { " · Winnings " (format_currency(card.winnings)) }
        }
    };
    render_layout("Round Summary", &content)
}
