use crate::{clock, ids, loader_for, row_loader, tick};
use pager::{LoadOutcome, Loader, LoaderConfig, Phase, SkipReason};
use payloads::Filters;
use payloads::scouting::{PlayerSummary, ReportSummary, ScoutSummary};
use serde_json::json;
use test_helpers::mock::{self, DevDataset};
use test_helpers::{MockReply, PLAYERS, REPORTS, SCOUTS, spawn_app};

#[tokio::test]
async fn duplicate_ids_across_pages_are_dropped() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        "/api/items",
        [
            MockReply::page(json!({
                "items": [{"id": "a"}, {"id": "b"}],
                "hasMore": true,
                "nextCursor": "c2",
            })),
            MockReply::page(json!({
                "items": [{"id": "b"}, {"id": "c"}],
                "hasMore": false,
            })),
        ],
    );
    let clock = clock();
    let loader =
        row_loader(&app, LoaderConfig::new("/api/items"), Filters::new(), &clock);

    assert_eq!(loader.load_more().await, LoadOutcome::Loaded { added: 2 });
    tick(&clock);
    assert_eq!(loader.load_more().await, LoadOutcome::Loaded { added: 1 });

    assert_eq!(ids(&loader), ["a", "b", "c"]);
    assert!(!loader.snapshot().has_more);
    assert_eq!(loader.phase(), Phase::Exhausted);

    let requests = app.store.requests_for("/api/items");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].param("cursor"), None);
    assert_eq!(requests[0].param("limit"), Some("50"));
    assert_eq!(requests[1].param("cursor"), Some("c2"));

    Ok(())
}

#[tokio::test]
async fn exhausted_list_makes_no_more_requests() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        "/api/items",
        [MockReply::page(json!({"data": [{"id": "a"}], "hasMore": false}))],
    );
    let clock = clock();
    let loader =
        row_loader(&app, LoaderConfig::new("/api/items"), Filters::new(), &clock);
    let (sentinel, _) = loader.attach_sentinel();

    loader.load_more().await;
    tick(&clock);
    assert_eq!(
        loader.load_more().await,
        LoadOutcome::Skipped(SkipReason::Exhausted)
    );
    assert_eq!(loader.on_visibility(sentinel, true).await, None);
    assert_eq!(app.store.requests_for("/api/items").len(), 1);

    Ok(())
}

#[tokio::test]
async fn items_array_is_found_under_any_key() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        "/api/items",
        [
            MockReply::page(json!({
                "meta": {"page": 1},
                "rows": [{"id": "a"}],
                "others": [{"id": "ignored"}],
                "hasMore": true,
                "nextCursor": "a",
            })),
            MockReply::page(json!({
                "items": [{"id": "ignored"}],
                "data": [{"id": "b"}],
                "hasMore": false,
            })),
        ],
    );
    let clock = clock();
    let loader =
        row_loader(&app, LoaderConfig::new("/api/items"), Filters::new(), &clock);

    loader.load_more().await;
    tick(&clock);
    loader.load_more().await;

    assert_eq!(ids(&loader), ["a", "b"]);

    Ok(())
}

#[tokio::test]
async fn players_page_through_numeric_cursors() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_players(mock::players(25));
    let clock = clock();
    let config = LoaderConfig::builder(PLAYERS).limit(10).build()?;
    let loader: Loader<PlayerSummary, _> = loader_for(
        &app,
        config,
        PlayerSummary::item_id,
        Filters::new(),
        &clock,
    );

    loop {
        match loader.load_more().await {
            LoadOutcome::Loaded { .. } => tick(&clock),
            LoadOutcome::Skipped(SkipReason::Exhausted) => break,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    let state = loader.snapshot();
    assert_eq!(state.items.len(), 25);
    // Only the first page carries the total
    assert_eq!(state.total_count, Some(25));
    assert_eq!(state.next_cursor, None);

    let requests = app.store.requests_for(PLAYERS);
    assert_eq!(requests.len(), 3);
    let second_cursor = requests[1].param("cursor").unwrap_or_default();
    assert!(second_cursor.parse::<i64>().is_ok());

    Ok(())
}

#[tokio::test]
async fn limit_above_the_server_cap_is_clamped() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_players(mock::players(150));
    let config = LoaderConfig::builder(PLAYERS).limit(500).build()?;
    let loader: Loader<PlayerSummary, _> = loader_for(
        &app,
        config,
        PlayerSummary::item_id,
        Filters::new(),
        &clock(),
    );

    loader.load_more().await;

    let state = loader.snapshot();
    assert_eq!(state.items.len(), test_helpers::MAX_PAGE_LIMIT);
    assert!(state.has_more);

    Ok(())
}

#[tokio::test]
async fn scouts_keep_the_first_page_total() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_scouts(mock::scouts(15));
    let clock = clock();
    let config = LoaderConfig::builder(SCOUTS).limit(10).build()?;
    let loader: Loader<ScoutSummary, _> = loader_for(
        &app,
        config,
        ScoutSummary::item_id,
        Filters::new(),
        &clock,
    );

    loader.load_more().await;
    tick(&clock);
    loader.load_more().await;

    let state = loader.snapshot();
    assert_eq!(state.items.len(), 15);
    assert_eq!(state.total_count, Some(15));
    assert!(!state.has_more);

    Ok(())
}

#[tokio::test]
async fn reports_arrive_newest_first() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create().load_into(&app.store);
    let config = LoaderConfig::builder(REPORTS).limit(20).build()?;
    let loader: Loader<ReportSummary, _> = loader_for(
        &app,
        config,
        ReportSummary::item_id,
        Filters::new(),
        &clock(),
    );

    loader.load_more().await;

    let state = loader.snapshot();
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.total_count, Some(mock::REPORT_COUNT as u64));
    assert!(
        state
            .items
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );

    Ok(())
}

#[tokio::test]
async fn refresh_starts_over_from_page_one() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_players(mock::players(30));
    let clock = clock();
    let config = LoaderConfig::builder(PLAYERS).limit(10).build()?;
    let loader: Loader<PlayerSummary, _> = loader_for(
        &app,
        config,
        PlayerSummary::item_id,
        Filters::new(),
        &clock,
    );

    loader.load_more().await;
    tick(&clock);
    loader.load_more().await;
    assert_eq!(loader.snapshot().items.len(), 20);

    // No throttle across a refresh
    assert_eq!(loader.refresh().await, LoadOutcome::Loaded { added: 10 });
    assert_eq!(loader.snapshot().items.len(), 10);

    let requests = app.store.requests_for(PLAYERS);
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].param("cursor"), None);

    Ok(())
}
