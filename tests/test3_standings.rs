mod common;

use common::{ADMIN, BEN, CAL, DEE, EVE, gross_on, setup_test_context};
use golf_league::controller::cache::StandingsCache;
use golf_league::controller::{admin, league, standings};
use golf_league::model::Flight;
use golf_league::storage::Storage;

#[tokio::test]
async fn weekly_standings_rank_verified_cards_per_flight() -> Result<(), Box<dyn std::error::Error>>
{
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    league::submit_scorecard(storage, BEN, &gross_on(0..9, 5)).await?; // net 40
    league::submit_scorecard(storage, CAL, &gross_on(0..9, 6)).await?; // net 44
    league::submit_scorecard(storage, DEE, &gross_on(0..9, 5)).await?; // net 38
    league::submit_scorecard(storage, EVE, &gross_on(0..9, 4)).await?; // net 33

    // Nothing is verified yet.
    assert!(standings::weekly_standings(storage, 1).await?.is_empty());

    league::verify_scorecard(storage, CAL, BEN, 1).await?;
    league::verify_scorecard(storage, BEN, CAL, 1).await?;
    league::verify_scorecard(storage, EVE, DEE, 1).await?;

    let week = standings::weekly_standings(storage, 1).await?;
    assert_eq!(week.len(), 2);

    let (flight, a) = &week[0];
    assert_eq!(*flight, Flight::A);
    let order: Vec<(i64, usize, u32)> = a.iter().map(|f| (f.member_id, f.position, f.points)).collect();
    assert_eq!(order, vec![(BEN, 1, 500), (CAL, 2, 300)]);

    // Eve's card is still pending, so Dee is alone in flight B.
    let (flight, b) = &week[1];
    assert_eq!(*flight, Flight::B);
    assert_eq!(b.len(), 1);
    assert_eq!((b[0].member_id, b[0].net), (DEE, 38));
    Ok(())
}

#[tokio::test]
async fn season_points_accumulate_across_weeks() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;

    league::submit_scorecard(storage, BEN, &gross_on(0..9, 5)).await?;
    league::submit_scorecard(storage, CAL, &gross_on(0..9, 6)).await?;
    league::verify_scorecard(storage, CAL, BEN, 1).await?;
    league::verify_scorecard(storage, BEN, CAL, 1).await?;

    admin::start_new_round(storage, ADMIN, 18, "All", "Blue").await?;
    admin::set_pairing(storage, ADMIN, 2, BEN, Some(CAL)).await?;

    // Full eighteen: Ben plays off 10, Cal off 20.
    let ben = league::submit_scorecard(storage, BEN, &gross_on(0..18, 5)).await?;
    let cal = league::submit_scorecard(storage, CAL, &gross_on(0..18, 5)).await?;
    assert_eq!((ben.net_score, cal.net_score), (80, 70));
    assert_eq!(ben.tee_played, "Blue");
    league::verify_scorecard(storage, CAL, BEN, 2).await?;
    league::verify_scorecard(storage, BEN, CAL, 2).await?;

    let season = standings::season_standings(storage).await?;
    assert_eq!(season.len(), 2);
    // Level on 800 points and two events each; the name breaks the tie.
    assert_eq!(season[0].member_id, BEN);
    assert_eq!(season[0].total_points, 800);
    assert_eq!(season[0].events_played, 2);
    assert_eq!(season[1].member_id, CAL);
    assert_eq!(season[1].total_points, 800);
    assert_eq!(season[1].weeks.get(&2).map(|w| w.position), Some(1));
    Ok(())
}

#[tokio::test]
async fn cache_follows_verification_and_reset() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;
    let cache = StandingsCache::new();

    league::submit_scorecard(storage, DEE, &gross_on(0..9, 5)).await?;
    league::submit_scorecard(storage, EVE, &gross_on(0..9, 4)).await?;
    league::verify_scorecard(storage, EVE, DEE, 1).await?;

    let week = cache.weekly(storage, 1).await?;
    assert_eq!(week[0].1.len(), 1);

    league::verify_scorecard(storage, DEE, EVE, 1).await?;
    cache.sync_card(storage, EVE, 1).await?;
    let week = cache.weekly(storage, 1).await?;
    let b: Vec<i64> = week[0].1.iter().map(|f| f.member_id).collect();
    assert_eq!(b, vec![EVE, DEE]);

    admin::reset_scorecard(storage, ADMIN, EVE, 1).await?;
    cache.sync_card(storage, EVE, 1).await?;
    let season = cache.season(storage).await?;
    assert_eq!(season.len(), 1);
    assert_eq!((season[0].member_id, season[0].total_points), (DEE, 500));
    assert_eq!(season, standings::season_standings(storage).await?);
    Ok(())
}

#[tokio::test]
async fn invalidated_cache_picks_up_flight_changes() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(include_str!("test1.sql")).await?;
    let storage: &dyn Storage = &ctx.storage;
    let cache = StandingsCache::new();

    league::submit_scorecard(storage, BEN, &gross_on(0..9, 5)).await?;
    league::verify_scorecard(storage, CAL, BEN, 1).await?;
    assert_eq!(cache.weekly(storage, 1).await?[0].0, Flight::A);

    admin::set_flight(storage, ADMIN, BEN, Flight::C).await?;
    assert_eq!(cache.weekly(storage, 1).await?[0].0, Flight::A);

    cache.invalidate().await;
    let week = cache.weekly(storage, 1).await?;
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].0, Flight::C);
    Ok(())
}
