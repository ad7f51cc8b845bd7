use crate::{clock, loader_for};
use pager::{HttpSource, LoadOutcome, Loader, LoaderConfig};
use payloads::Filters;
use payloads::scouting::PlayerSummary;
use test_helpers::{PLAYERS, mock, spawn_app};

fn player_names(loader: &Loader<PlayerSummary, HttpSource>) -> Vec<String> {
    loader
        .snapshot()
        .items
        .into_iter()
        .map(|player| player.player_name)
        .collect()
}

#[tokio::test]
async fn changing_search_restarts_from_page_one() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_players(mock::players(60));
    let config = LoaderConfig::builder(PLAYERS).limit(10).build()?;
    let loader = loader_for(
        &app,
        config,
        PlayerSummary::item_id,
        Filters::new().with("search", ""),
        &clock(),
    );

    loader.load_more().await;
    assert_eq!(loader.snapshot().items.len(), 10);
    assert!(loader.snapshot().next_cursor.is_some());

    // Reset happens synchronously, before page one of the new search lands
    assert!(loader.set_filters(Filters::new().with("search", "messi")));
    let state = loader.snapshot();
    assert!(state.items.is_empty());
    assert_eq!(state.next_cursor, None);
    assert_eq!(state.total_count, None);

    // No throttle across the reset
    assert!(matches!(loader.load_more().await, LoadOutcome::Loaded { .. }));
    assert!(
        player_names(&loader)
            .iter()
            .all(|name| name.to_lowercase().contains("messi"))
    );

    let requests = app.store.requests_for(PLAYERS);
    assert_eq!(requests.len(), 2);
    // Blank filters are not sent
    assert_eq!(requests[0].param("search"), None);
    assert_eq!(requests[1].param("search"), Some("messi"));
    assert_eq!(requests[1].param("cursor"), None);

    Ok(())
}

#[tokio::test]
async fn equal_filters_keep_the_loaded_pages() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_players(mock::players(30));
    let config = LoaderConfig::builder(PLAYERS).limit(10).build()?;
    let filters = Filters::new()
        .with("nationality", "Spain")
        .with("position", "CM");
    let loader = loader_for(
        &app,
        config,
        PlayerSummary::item_id,
        filters,
        &clock(),
    );

    loader.load_more().await;
    let before = loader.snapshot();

    // Same values built in another order
    let same = Filters::new()
        .with("position", "CM")
        .with("nationality", "Spain");
    assert_eq!(loader.apply_filters(same).await, None);
    assert_eq!(loader.snapshot(), before);
    assert_eq!(app.store.requests_for(PLAYERS).len(), 1);

    Ok(())
}

#[tokio::test]
async fn nationality_filter_is_sent_and_applied() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_players(mock::players(70));
    let loader = loader_for(
        &app,
        LoaderConfig::new(PLAYERS),
        PlayerSummary::item_id,
        Filters::new(),
        &clock(),
    );

    let outcome = loader
        .apply_filters(Filters::new().with("nationality", "Norway"))
        .await;

    assert!(matches!(outcome, Some(LoadOutcome::Loaded { added }) if added > 0));
    let state = loader.snapshot();
    assert!(
        state
            .items
            .iter()
            .all(|player| player.nationality_1.as_deref() == Some("Norway"))
    );
    assert_eq!(state.total_count, Some(state.items.len() as u64));
    let requests = app.store.requests_for(PLAYERS);
    assert_eq!(requests[0].param("nationality"), Some("Norway"));

    Ok(())
}
