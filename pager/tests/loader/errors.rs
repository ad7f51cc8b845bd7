use crate::{Row, clock, ids, row_loader, tick};
use pager::{
    ErrorMessages, HttpSource, LoadError, LoadOutcome, Loader, LoaderConfig,
    PageSource, Pager, Phase,
};
use payloads::{
    APIClient, ClientError, Filters, PageRequest, PageResponse, StatusCode,
};
use serde_json::json;
use std::cell::Cell;
use std::net::TcpListener;
use std::rc::Rc;
use test_helpers::{MockReply, PLAYERS, assert_status_code, spawn_app};

/// Serves the first page from `live` and every later one from `dead`.
struct ConnectionLostAfterFirstPage {
    live: HttpSource,
    dead: HttpSource,
    served: Cell<bool>,
}

impl PageSource<Row> for ConnectionLostAfterFirstPage {
    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<Row>, ClientError> {
        let source = if self.served.replace(true) {
            &self.dead
        } else {
            &self.live
        };
        PageSource::<Row>::fetch_page(source, request).await
    }
}

/// A client for a port nothing is listening on.
fn unreachable_client() -> anyhow::Result<APIClient> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);

    Ok(APIClient {
        address: format!("http://127.0.0.1:{port}"),
        inner_client: reqwest::Client::new(),
    })
}

#[tokio::test]
async fn unauthorized_first_page_shows_the_configured_message() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.store
        .script(PLAYERS, [MockReply::error(401, "Not authenticated")]);
    let messages = ErrorMessages {
        unauthorized: "Your session expired. Please sign in.".into(),
        ..Default::default()
    };
    let config = LoaderConfig::builder(PLAYERS).messages(messages).build()?;
    let loader = row_loader(&app, config, Filters::new(), &clock());

    let outcome = loader.load_more().await;

    let expected =
        LoadError::Unauthorized("Your session expired. Please sign in.".into());
    assert_eq!(outcome, LoadOutcome::Failed(expected.clone()));
    let state = loader.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.has_more);
    assert!(!state.loading);
    assert_eq!(state.error, Some(expected));
    assert_eq!(loader.phase(), Phase::Errored);

    Ok(())
}

#[tokio::test]
async fn forbidden_uses_the_default_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(PLAYERS, [MockReply::Status(403)]);
    let loader =
        row_loader(&app, LoaderConfig::new(PLAYERS), Filters::new(), &clock());

    let LoadOutcome::Failed(error) = loader.load_more().await else {
        panic!("expected a failure");
    };
    assert_eq!(error.status(), Some(403));
    assert_eq!(
        error.to_string(),
        "Access denied. You do not have permission to access this resource."
    );

    Ok(())
}

#[tokio::test]
async fn server_message_is_shown_for_other_statuses() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        PLAYERS,
        [
            MockReply::error(500, "Database unavailable"),
            MockReply::Json {
                status: 502,
                body: json!({ "__error": "Upstream timed out" }),
            },
            MockReply::Status(503),
        ],
    );
    let clock = clock();
    let loader =
        row_loader(&app, LoaderConfig::new(PLAYERS), Filters::new(), &clock);

    let mut messages = Vec::new();
    for _ in 0..3 {
        if let LoadOutcome::Failed(error) = loader.refresh().await {
            messages.push(error.to_string());
        }
        tick(&clock);
    }

    assert_eq!(
        messages,
        ["Database unavailable", "Upstream timed out", "HTTP error 503"]
    );

    Ok(())
}

#[tokio::test]
async fn bad_cursor_surfaces_the_server_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let request = payloads::PageRequest::after(
        "no-such-player",
        payloads::DEFAULT_PAGE_LIMIT,
        Filters::new(),
    );

    let result = app
        .client
        .get_page::<serde_json::Value>(PLAYERS, &request)
        .await;

    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn malformed_body_is_reported() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        "/api/items",
        [MockReply::page(json!({ "items": [{ "name": "no id" }] }))],
    );
    let loader =
        row_loader(&app, LoaderConfig::new("/api/items"), Filters::new(), &clock());

    let outcome = loader.load_more().await;

    assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Malformed(_))));
    assert!(ids(&loader).is_empty());

    Ok(())
}

#[tokio::test]
async fn refresh_recovers_after_a_failure() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        "/api/items",
        [
            MockReply::page(json!({
                "items": [{ "id": "a" }],
                "hasMore": true,
                "nextCursor": "a",
            })),
            MockReply::error(500, "boom"),
            MockReply::page(json!({
                "items": [{ "id": "a" }, { "id": "b" }],
                "hasMore": false,
            })),
        ],
    );
    let clock = clock();
    let loader =
        row_loader(&app, LoaderConfig::new("/api/items"), Filters::new(), &clock);

    loader.load_more().await;
    tick(&clock);
    assert!(matches!(loader.load_more().await, LoadOutcome::Failed(_)));
    assert_eq!(ids(&loader), ["a"]);

    assert_eq!(loader.refresh().await, LoadOutcome::Loaded { added: 2 });
    assert_eq!(loader.snapshot().error, None);
    assert_eq!(ids(&loader), ["a", "b"]);

    Ok(())
}

#[tokio::test]
async fn lost_connection_keeps_loaded_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.script(
        "/api/items",
        [MockReply::page(json!({
            "items": [{ "id": "a" }, { "id": "b" }],
            "hasMore": true,
            "nextCursor": "b",
        }))],
    );
    let source = ConnectionLostAfterFirstPage {
        live: HttpSource::new(app.api_client(), "/api/items"),
        dead: HttpSource::new(unreachable_client()?, "/api/items"),
        served: Cell::new(false),
    };
    let clock = clock();
    let pager = Pager::<Row>::new(
        LoaderConfig::new("/api/items"),
        Rc::new(|row: &Row| row.id.clone()),
        Filters::new(),
    );
    let loader = Loader::new(pager, source, clock.clone());

    assert_eq!(loader.load_more().await, LoadOutcome::Loaded { added: 2 });
    tick(&clock);
    let LoadOutcome::Failed(error) = loader.load_more().await else {
        panic!("expected a failure");
    };

    assert!(matches!(error, LoadError::Network(_)));
    assert_eq!(error.to_string(), ErrorMessages::default().network);
    assert_eq!(error.status(), None);

    let state = loader.snapshot();
    assert_eq!(
        state.items.iter().map(|row| row.id.as_str()).collect::<Vec<_>>(),
        ["a", "b"]
    );
    assert!(!state.has_more);
    assert!(!state.loading);
    assert_eq!(loader.phase(), Phase::Errored);

    Ok(())
}

#[tokio::test]
async fn unreachable_server_fails_the_first_page() -> anyhow::Result<()> {
    let source = HttpSource::new(unreachable_client()?, PLAYERS);
    let messages = ErrorMessages {
        network: "You appear to be offline.".into(),
        ..Default::default()
    };
    let config = LoaderConfig::builder(PLAYERS).messages(messages).build()?;
    let pager = Pager::<Row>::new(
        config,
        Rc::new(|row: &Row| row.id.clone()),
        Filters::new(),
    );
    let loader = Loader::new(pager, source, clock());

    let outcome = loader.load_more().await;

    assert_eq!(
        outcome,
        LoadOutcome::Failed(LoadError::Network("You appear to be offline.".into()))
    );
    assert!(loader.snapshot().items.is_empty());

    Ok(())
}
