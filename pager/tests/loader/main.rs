mod errors;
mod filters;
mod paging;

use jiff::Span;
use pager::{HttpSource, ItemIdFn, Loader, LoaderConfig, Pager, TimeSource};
use payloads::Filters;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use test_helpers::{TestApp, spawn_app};

/// A generic row for scripted replies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Row {
    pub id: String,
}

pub fn clock() -> TimeSource {
    TimeSource::mock("2025-01-01T00:00:00Z".parse().unwrap())
}

/// Step past the throttle window.
pub fn tick(clock: &TimeSource) {
    clock.advance(Span::new().seconds(1));
}

/// A loader for `config.endpoint` on `app`, throttled against `clock`.
pub fn loader_for<T: DeserializeOwned + 'static>(
    app: &TestApp,
    config: LoaderConfig,
    item_id: fn(&T) -> String,
    filters: Filters,
    clock: &TimeSource,
) -> Loader<T, HttpSource> {
    let source = HttpSource::new(app.api_client(), config.endpoint.clone());
    let item_id: ItemIdFn<T> = Rc::new(item_id);
    Loader::new(Pager::new(config, item_id, filters), source, clock.clone())
}

pub fn row_loader(
    app: &TestApp,
    config: LoaderConfig,
    filters: Filters,
    clock: &TimeSource,
) -> Loader<Row, HttpSource> {
    loader_for(app, config, |row: &Row| row.id.clone(), filters, clock)
}

pub fn ids(loader: &Loader<Row, HttpSource>) -> Vec<String> {
    loader.snapshot().items.into_iter().map(|row| row.id).collect()
}

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client.health_check().await?;

    Ok(())
}
