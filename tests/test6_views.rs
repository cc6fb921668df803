mod common;

use common::{ADMIN, BEN, CAL, DEE, EVE, gross_on, setup_test_context};
use golf_league::controller::{admin, league, standings};
use golf_league::scoring::NetScoreCalculator;
use golf_league::storage::Storage;
use golf_league::view::admin::render_tournament_ops;
use golf_league::view::score::{render_enter_score, render_round_summary};
use golf_league::view::standings::{render_season_standings, render_weekly_standings};
use scraper::{Html, Selector};

fn select_texts(document: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("valid selector");
    document
        .select(&selector)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect()
}

#[tokio::test]
async fn enter_score_form_covers_only_the_holes_in_play() -> Result<(), Box<dyn std::error::Error>>
{
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    let gross = gross_on(0..3, 5);
    let preview = league::score_preview(storage, CAL, &gross).await?;
    let document = Html::parse_document(&render_enter_score(&preview, &gross, None).into_string());

    let inputs = Selector::parse("form#score-entry input[type=number]").expect("valid selector");
    let names: Vec<&str> = document
        .select(&inputs)
        .filter_map(|e| e.value().attr("name"))
        .collect();
    assert_eq!(names, (1..=9).map(|h| format!("h{h}")).collect::<Vec<_>>());

    // Cal plays off 10 on nine holes: two strokes on the hardest hole, one everywhere else.
    let pops = select_texts(&document, "tr.pops td");
    assert_eq!(pops[0], "Strokes");
    assert_eq!(pops[1], "•");
    assert_eq!(pops[2], "••");
    assert!(pops[3..].iter().all(|p| p == "•"));

    assert_eq!(select_texts(&document, "#total-gross"), vec!["15"]);
    assert_eq!(select_texts(&document, "#total-net"), vec!["11"]);
    Ok(())
}

#[tokio::test]
async fn submitted_member_sees_a_summary_link() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    league::submit_scorecard(storage, BEN, &gross_on(0..9, 5)).await?;
    let gross = [0; 18];
    let preview = league::score_preview(storage, BEN, &gross).await?;
    let html = render_enter_score(&preview, &gross, Some("already in")).into_string();
    let document = Html::parse_document(&html);

    assert!(select_texts(&document, "form#score-entry").is_empty());
    assert_eq!(select_texts(&document, "div.error"), vec!["already in"]);
    assert!(html.contains("/round-summary?member=2&amp;week=1"));
    Ok(())
}

#[tokio::test]
async fn round_summary_lists_pops_and_net() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    let card = league::submit_scorecard(storage, BEN, &gross_on(0..9, 5)).await?;
    let member = storage.get_member(BEN).await?;
    let course = storage.get_active_course().await?;
    let config = card.round_configuration()?;
    let table = course.allocation()?;
    assert_eq!(card.effective_handicap, 5);
    let result = NetScoreCalculator::new(&table, &config, card.effective_handicap)
        .calculate(&card.hole_scores);

    let html = render_round_summary(&member, &card, &course, &config, &result).into_string();
    let document = Html::parse_document(&html);

    let net = select_texts(&document, "#round-summary tr.net td");
    assert_eq!(net.len(), 11);
    assert_eq!(net[1..10], ["4", "4", "5", "4", "5", "4", "5", "4", "5"]);
    assert_eq!(net[10], "40");
    assert_eq!(select_texts(&document, "#round-summary tr.pops td")[10], "5");
    assert!(select_texts(&document, "p.splits").is_empty());
    assert_eq!(select_texts(&document, "p.status"), vec!["Awaiting partner verification"]);
    Ok(())
}

#[tokio::test]
async fn standings_pages_group_by_flight() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    league::submit_scorecard(storage, BEN, &gross_on(0..9, 5)).await?;
    league::submit_scorecard(storage, CAL, &gross_on(0..9, 6)).await?;
    league::submit_scorecard(storage, DEE, &gross_on(0..9, 5)).await?;
    for member in [BEN, CAL, DEE] {
        league::verify_scorecard(storage, ADMIN, member, 1).await?;
    }

    let week = standings::weekly_standings(storage, 1).await?;
    let document = Html::parse_document(&render_weekly_standings(1, &week, &[1]).into_string());
    let a_rows = select_texts(&document, "#flight-A tbody tr td:first-child");
    assert_eq!(a_rows, vec!["1st", "2nd"]);
    let b_points = select_texts(&document, "#flight-B tbody tr td:last-child");
    assert_eq!(b_points, vec!["500"]);

    let season = standings::season_standings(storage).await?;
    let document = Html::parse_document(&render_season_standings(&season, &[1]).into_string());
    assert_eq!(select_texts(&document, "#flight-A td.total"), vec!["500", "300"]);
    assert_eq!(select_texts(&document, "#flight-B td.events"), vec!["1"]);
    assert!(select_texts(&document, "#flight-C").is_empty());
    Ok(())
}

#[tokio::test]
async fn tournament_ops_page_offers_row_actions() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    league::submit_scorecard(storage, EVE, &gross_on(0..9, 4)).await?;
    let rows = admin::tournament_ops(storage, ADMIN, 1).await?;
    let document =
        Html::parse_document(&render_tournament_ops(ADMIN, 1, &rows).into_string());

    let statuses = select_texts(&document, "#tournament-ops td.status-pending");
    assert_eq!(statuses, vec!["Pending"]);
    let verify = Selector::parse("tr[data-member=\"5\"] form[action=\"/admin/verify\"]")
        .expect("valid selector");
    assert_eq!(document.select(&verify).count(), 1);
    let reset = Selector::parse("form[action=\"/admin/reset\"]").expect("valid selector");
    assert_eq!(document.select(&reset).count(), 1);
    Ok(())
}
