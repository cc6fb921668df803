mod common;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::Value;

use common::{ADMIN, BEN, CAL, DEE, setup_test_context};
use golf_league::controller::admin;
use golf_league::controller::cache::StandingsCache;
use golf_league::controller::http_handlers::routes;
use golf_league::storage::Storage;

fn front_nine_form(member: i64, score: i32) -> Vec<(String, String)> {
    let mut form = vec![
        ("member".to_string(), member.to_string()),
        ("json".to_string(), "1".to_string()),
    ];
    for hole in 1..=9 {
        form.push((format!("h{hole}"), score.to_string()));
    }
    form
}

#[actix_web::test]
async fn score_submission_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(ctx.storage.clone()))
            .app_data(Data::new(StandingsCache::new()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/enter-score")
        .set_form(front_nine_form(BEN, 5))
        .to_request();
    let card: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(card["score"], 45);
    assert_eq!(card["net_score"], 40);
    assert_eq!(card["is_verified"], false);

    let req = test::TestRequest::post()
        .uri("/enter-score")
        .set_form(front_nine_form(BEN, 4))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("already submitted")));

    // A non-partner is refused, the partner is accepted.
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_form([("verifier", "4"), ("member", "2"), ("json", "1")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/verify")
        .set_form([("verifier", "3"), ("member", "2"), ("json", "1")])
        .to_request();
    let card: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(card["is_verified"], true);

    let req = test::TestRequest::get()
        .uri("/standings?view=weekly&week=1&json=1")
        .to_request();
    let week: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(week["week"], 1);
    assert_eq!(week["flights"][0][0], "A");
    assert_eq!(week["flights"][0][1][0]["member_id"], BEN);
    assert_eq!(week["flights"][0][1][0]["points"], 500);

    let req = test::TestRequest::get()
        .uri(&format!("/round-summary?member={BEN}&week=1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(html.contains("id=\"round-summary\""));

    assert!(ctx.storage.get_scorecard(CAL, 1).await?.is_none());
    Ok(())
}

#[actix_web::test]
async fn rejected_card_rerenders_the_form() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(ctx.storage.clone()))
            .app_data(Data::new(StandingsCache::new()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/enter-score")
        .set_form([("member", "4"), ("h1", "5"), ("h2", "5")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(html.contains("please enter a score for hole 3"));
    assert!(html.contains("id=\"score-entry\""));

    let req = test::TestRequest::post()
        .uri("/enter-score")
        .set_form([("member", "4"), ("h1", "five")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/enter-score?member=99")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_web::test]
async fn admin_routes_require_an_admin() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(ctx.storage.clone()))
            .app_data(Data::new(StandingsCache::new()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/admin/ops?admin={DEE}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/admin/new-round")
        .set_form([("admin", "1"), ("holes", "9"), ("side", "All"), ("tee", "White")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/admin/new-round")
        .set_form([("admin", "1"), ("holes", "18"), ("side", "Front"), ("tee", "Black")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/admin/ops?admin=1&week=2")
    );

    let settings = ctx.storage.get_settings().await?;
    assert_eq!(settings.current_week, 2);
    assert_eq!(settings.side_to_play, "All");

    let req = test::TestRequest::get()
        .uri(&format!("/admin/ops?admin={ADMIN}&json=1"))
        .to_request();
    let rows: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.as_array().map(Vec::len), Some(5));
    Ok(())
}

#[actix_web::test]
async fn round_summary_keeps_the_submitted_handicap() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(ctx.storage.clone()))
            .app_data(Data::new(StandingsCache::new()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/enter-score")
        .set_form(front_nine_form(BEN, 5))
        .to_request();
    let card: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(card["net_score"], 40);
    assert_eq!(card["effective_handicap"], 5);

    admin::set_handicap(&ctx.storage, ADMIN, BEN, 30.0).await?;

    let req = test::TestRequest::get()
        .uri(&format!("/round-summary?member={BEN}&week=1&json=1"))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["scorecard"]["net_score"], 40);
    assert_eq!(summary["holes"]["total_net"], summary["scorecard"]["net_score"]);
    assert_eq!(summary["holes"]["total_pops"], 5);
    Ok(())
}
