use crate::{
    Completion, DeferToken, ItemIdFn, LoadError, LoadStart, LoaderConfig,
    LoaderState, ObservationId, Pager, Phase, SkipReason, TimeSource,
};
use futures::future::{AbortHandle, Abortable};
use payloads::{APIClient, ClientError, Filters, PageRequest, PageResponse};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::time::Duration;

/// Something that can serve pages of `T`.
#[allow(async_fn_in_trait)]
pub trait PageSource<T> {
    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<T>, ClientError>;
}

/// Pages served by a REST endpoint through [`APIClient`].
pub struct HttpSource {
    client: APIClient,
    endpoint: String,
}

impl HttpSource {
    pub fn new(client: APIClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<T: DeserializeOwned> PageSource<T> for HttpSource {
    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<T>, ClientError> {
        self.client.get_page(&self.endpoint, request).await
    }
}

/// What one call to [`Loader::load_more`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { added: usize },
    Failed(LoadError),
    /// Throttled. Call [`Loader::run_deferred`] with `token` after
    /// `retry_after`.
    Deferred {
        token: DeferToken,
        retry_after: Duration,
    },
    Skipped(SkipReason),
    /// The list was reset while the page was in flight.
    Stale,
}

impl LoadOutcome {
    /// Whether the loader state differs from before the call. Deferred and
    /// skipped loads leave it untouched.
    pub fn changes_state(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Failed(_) | Self::Stale)
    }
}

/// Drives a [`Pager`] against a [`PageSource`] on a single-threaded
/// executor.
///
/// The outstanding request is aborted on reset, so there is never more than
/// one request per loader.
pub struct Loader<T, S> {
    pager: RefCell<Pager<T>>,
    source: S,
    clock: TimeSource,
    in_flight: RefCell<Option<AbortHandle>>,
}

impl<T: DeserializeOwned> Loader<T, HttpSource> {
    /// A loader for `config.endpoint` on `client`.
    pub fn http(
        client: APIClient,
        config: LoaderConfig,
        item_id: ItemIdFn<T>,
        filters: Filters,
    ) -> Self {
        let source = HttpSource::new(client, config.endpoint.clone());
        Self::new(Pager::new(config, item_id, filters), source, TimeSource::system())
    }
}

impl<T, S: PageSource<T>> Loader<T, S> {
    pub fn new(pager: Pager<T>, source: S, clock: TimeSource) -> Self {
        Self {
            pager: RefCell::new(pager),
            source,
            clock,
            in_flight: RefCell::new(None),
        }
    }

    pub fn config(&self) -> LoaderConfig {
        self.pager.borrow().config().clone()
    }

    pub fn snapshot(&self) -> LoaderState<T>
    where
        T: Clone,
    {
        self.pager.borrow().snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.pager.borrow().phase()
    }

    pub fn filters(&self) -> Filters {
        self.pager.borrow().filters().clone()
    }

    /// Fetch the next page if nothing is loading, more pages exist and the
    /// throttle window has passed.
    pub async fn load_more(&self) -> LoadOutcome {
        let start = self.pager.borrow_mut().begin_load(self.clock.now());
        let ticket = match start {
            LoadStart::Start(ticket) => ticket,
            LoadStart::Deferred { token, retry_after } => {
                return LoadOutcome::Deferred { token, retry_after };
            }
            LoadStart::Skipped(reason) => return LoadOutcome::Skipped(reason),
        };

        let (handle, registration) = AbortHandle::new_pair();
        *self.in_flight.borrow_mut() = Some(handle);

        let fetched =
            Abortable::new(self.source.fetch_page(&ticket.request), registration)
                .await;
        let Ok(result) = fetched else {
            tracing::debug!("Page request aborted by a reset");
            return LoadOutcome::Stale;
        };
        self.in_flight.borrow_mut().take();

        match self.pager.borrow_mut().complete(ticket, result) {
            Completion::Applied { added } => LoadOutcome::Loaded { added },
            Completion::Failed(error) => LoadOutcome::Failed(error),
            Completion::Stale => LoadOutcome::Stale,
        }
    }

    /// Run a deferred retry, unless a newer retry, a started fetch, or a
    /// reset has replaced it.
    pub async fn run_deferred(&self, token: DeferToken) -> LoadOutcome {
        if !self.pager.borrow().deferred_due(&token) {
            tracing::debug!(%token, "Dropping superseded retry");
            return LoadOutcome::Skipped(SkipReason::Superseded);
        }
        self.load_more().await
    }

    /// Clear the list without fetching. The state reads as idle until the
    /// next [`Loader::load_more`].
    pub fn reset(&self) {
        self.abort_in_flight();
        self.pager.borrow_mut().clear();
    }

    /// Clear the list and load page 1 again.
    pub async fn refresh(&self) -> LoadOutcome {
        self.abort_in_flight();
        self.pager.borrow_mut().reset();
        self.load_more().await
    }

    /// Switch filters. Returns whether they changed, in which case the list
    /// was reset and the caller should load page 1.
    pub fn set_filters(&self, filters: Filters) -> bool {
        let changed = self.pager.borrow_mut().set_filters(filters);
        if changed {
            // The pager has already moved to a new generation.
            self.abort_in_flight();
        }
        changed
    }

    /// Switch filters and, if they changed, load page 1 of the new dataset.
    pub async fn apply_filters(&self, filters: Filters) -> Option<LoadOutcome> {
        if self.set_filters(filters) {
            Some(self.load_more().await)
        } else {
            None
        }
    }

    pub fn attach_sentinel(&self) -> (ObservationId, Option<ObservationId>) {
        self.pager.borrow_mut().attach_sentinel()
    }

    pub fn detach_sentinel(&self, id: ObservationId) -> bool {
        self.pager.borrow_mut().detach_sentinel(id)
    }

    /// Handle a visibility event from the sentinel.
    pub async fn on_visibility(
        &self,
        id: ObservationId,
        is_intersecting: bool,
    ) -> Option<LoadOutcome> {
        if !self.pager.borrow().sentinel_triggers(id, is_intersecting) {
            return None;
        }
        tracing::debug!(%id, "Sentinel visible, loading more");
        Some(self.load_more().await)
    }

    fn abort_in_flight(&self) {
        if let Some(handle) = self.in_flight.borrow_mut().take() {
            handle.abort();
        }
    }
}
