use maud::{Markup, html};

use crate::controller::admin::TournamentOpsRow;
use crate::model::format_currency;
use crate::view::render_layout;

fn hidden_ids(admin_id: i64, member_id: i64, week: i64) -> Markup {
    html! {
        input type="hidden" name="admin" value=(admin_id);
        input type="hidden" name="member" value=(member_id);
        input type="hidden" name="week" value=(week);
    }
}

#[must_use]
pub fn render_tournament_ops(admin_id: i64, week: i64, rows: &[TournamentOpsRow]) -> Markup {
    let content = html! {
        h1 { "Tournament Ops · Week " (week) }
        table class="styled-table" id="tournament-ops" {
            thead {
                tr {
                    th { "Player" }
                    th { "Flight" }
                    th { "Partner" }
                    th { "Gross" }
                    th { "Net" }
                    th { "Wallet" }
                    th { "Status" }
                    th { "Actions" }
                }
            }
            tbody {
                @for row in rows {
                    tr data-member=(row.member.id) {
                        td { (row.member.display_name) }
                        td { (row.member.flight) }
                        td { (row.partner.as_ref().map(|p| p.display_name.as_str()).unwrap_or("-")) }
                        td { (row.scorecard.as_ref().map(|c| c.score.to_string()).unwrap_or_default()) }
                        td { (row.scorecard.as_ref().map(|c| c.net_score.to_string()).unwrap_or_default()) }
                        td { (format_currency(row.member.wallet_balance)) }
                        td class=(row.status.css_class()) { (row.status) }
                        td class="actions" {
                            form method="post" action="/admin/check-in" {
                                (hidden_ids(admin_id, row.member.id, week))
                                button type="submit" {
                                    @if row.member.is_checked_in { "Check out" } @else { "Check in" }
                                }
                            }
                            @if let Some(card) = &row.scorecard {
                                @if !card.is_verified {
                                    form method="post" action="/admin/verify" {
                                        (hidden_ids(admin_id, row.member.id, week))
                                        button type="submit" { "Verify" }
                                    }
                                }
                                form method="post" action="/admin/reset" {
                                    (hidden_ids(admin_id, row.member.id, week))
                                    button type="submit" { "Reset" }
                                }
                            }
                        }
                    }
                }
            }
        }
        section id="new-round" {
            h2 { "Start New Round" }
            form method="post" action="/admin/new-round" {
                input type="hidden" name="admin" value=(admin_id);
                select name="holes" {
                    option value="9" { "9 holes" }
                    option value="18" { "18 holes" }
                }
                select name="side" {
                    option value="Front" { "Front" }
                    option value="Back" { "Back" }
                    option value="All" { "All" }
                }
                select name="tee" {
                    @for tee in crate::scoring::TEE_COLORS {
                        option value=(tee) { (tee) }
                    }
                }
                button type="submit" { "Start" }
            }
        }
    };
    render_layout("Tournament Ops", &content)
}
