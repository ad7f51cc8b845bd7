use gloo_timers::future::TimeoutFuture;
use pager::{
    DEFAULT_ROOT_MARGIN, DEFAULT_THROTTLE, HttpSource, ItemIdFn, LoadError,
    LoadOutcome, Loader, LoaderConfig, ObservationId, RootMargin,
};
use payloads::{DEFAULT_PAGE_LIMIT, Filters};
use serde::de::DeserializeOwned;
use std::pin::pin;
use std::rc::Rc;
use std::task::Poll;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};
use yew::prelude::*;

use crate::get_api_client;

/// Input to [`use_infinite_scroll`].
pub struct InfiniteScrollConfig<T> {
    /// Absolute path of the list endpoint, e.g. `/api/players`.
    pub api_endpoint: String,
    pub get_item_id: ItemIdFn<T>,
    /// Changing these by value starts the list over.
    pub filters: Filters,
    pub limit: u32,
    pub root_margin: String,
    pub throttle_ms: u64,
}

impl<T> InfiniteScrollConfig<T> {
    pub fn new(
        api_endpoint: impl Into<String>,
        get_item_id: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            get_item_id: Rc::new(get_item_id),
            filters: Filters::new(),
            limit: DEFAULT_PAGE_LIMIT.get(),
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
        }
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// What [`use_infinite_scroll`] hands back to the list view.
pub struct InfiniteScrollHandle<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<LoadError>,
    pub has_more: bool,
    pub total_count: Option<u64>,
    /// Attach to the element at the bottom of the list.
    pub observer_target: NodeRef,
    pub refresh: Callback<()>,
    pub load_more: Callback<()>,
}

type ListLoader<T> = Rc<Loader<T, HttpSource>>;

/// Settings that require a new loader when they change.
#[derive(Clone, PartialEq)]
struct LoaderKey {
    endpoint: String,
    limit: u32,
    root_margin: String,
    throttle_ms: u64,
}

/// Infinite scrolling over a cursor-paginated endpoint.
///
/// The first page loads on mount. Further pages load when the element behind
/// `observer_target` comes within the root margin of the viewport.
#[hook]
pub fn use_infinite_scroll<T>(
    config: InfiniteScrollConfig<T>,
) -> InfiniteScrollHandle<T>
where
    T: Clone + DeserializeOwned + 'static,
{
    let InfiniteScrollConfig {
        api_endpoint,
        get_item_id,
        filters,
        limit,
        root_margin,
        throttle_ms,
    } = config;
    let key = LoaderKey {
        endpoint: api_endpoint,
        limit,
        root_margin,
        throttle_ms,
    };

    let rerender = use_force_update();
    let observer_target = use_node_ref();

    let loader: ListLoader<T> = {
        let filters = filters.clone();
        use_memo(key.clone(), move |key| {
            Loader::http(get_api_client(), loader_config(key), get_item_id, filters)
        })
    };

    // First page, and cancel whatever is outstanding on unmount
    {
        let loader = loader.clone();
        let rerender = rerender.clone();
        use_effect_with(key.clone(), move |_| {
            spawn_load(loader.clone(), rerender, LoadRequest::Next);
            move || loader.reset()
        });
    }

    {
        let loader = loader.clone();
        let rerender = rerender.clone();
        use_effect_with(filters, move |filters| {
            spawn_load(loader, rerender, LoadRequest::Filters(filters.clone()));
        });
    }

    let state = loader.snapshot();

    // A new observer reports the sentinel's visibility once, so one is
    // created whenever a load settles and the sentinel may still be in view
    {
        let loader = loader.clone();
        let rerender = rerender.clone();
        let observer_target = observer_target.clone();
        let deps = (key, state.has_more, state.loading);
        use_effect_with(deps, move |_| {
            let observation = observe(&observer_target, loader.clone(), rerender);
            move || {
                if let Some(observation) = observation {
                    observation.observer.disconnect();
                    loader.detach_sentinel(observation.id);
                }
            }
        });
    }

    let refresh = {
        let loader = loader.clone();
        let rerender = rerender.clone();
        Callback::from(move |_| {
            spawn_load(loader.clone(), rerender.clone(), LoadRequest::Refresh)
        })
    };
    let load_more = {
        let loader = loader.clone();
        Callback::from(move |_| {
            spawn_load(loader.clone(), rerender.clone(), LoadRequest::Next)
        })
    };

    InfiniteScrollHandle {
        items: state.items,
        loading: state.loading,
        error: state.error,
        has_more: state.has_more,
        total_count: state.total_count,
        observer_target,
        refresh,
        load_more,
    }
}

fn loader_config(key: &LoaderKey) -> LoaderConfig {
    LoaderConfig::builder(key.endpoint.as_str())
        .limit(key.limit)
        .root_margin(key.root_margin.as_str())
        .throttle_ms(key.throttle_ms)
        .build()
        .unwrap_or_else(|e| {
            tracing::error!("Invalid loader config for {}: {e}", key.endpoint);
            LoaderConfig::new(key.endpoint.as_str())
        })
}

enum LoadRequest {
    Next,
    Retry(pager::DeferToken),
    Refresh,
    Visible(ObservationId),
    Filters(Filters),
}

impl LoadRequest {
    async fn run<T: DeserializeOwned>(
        self,
        loader: &Loader<T, HttpSource>,
    ) -> Option<LoadOutcome> {
        match self {
            Self::Next => Some(loader.load_more().await),
            Self::Retry(token) => Some(loader.run_deferred(token).await),
            Self::Refresh => Some(loader.refresh().await),
            Self::Visible(id) => loader.on_visibility(id, true).await,
            Self::Filters(filters) => loader.apply_filters(filters).await,
        }
    }
}

/// Run `request` in the background. The view re-renders once a fetch has
/// started and again when the state has changed. Throttled loads are retried
/// after the window has passed.
fn spawn_load<T>(
    loader: ListLoader<T>,
    rerender: UseForceUpdateHandle,
    request: LoadRequest,
) where
    T: DeserializeOwned + 'static,
{
    yew::platform::spawn_local(async move {
        let (started, outcome) = {
            let mut load = pin!(request.run(&loader));
            match futures::poll!(load.as_mut()) {
                Poll::Ready(outcome) => (false, outcome),
                Poll::Pending => {
                    rerender.force_update();
                    (true, load.await)
                }
            }
        };
        if started || outcome.as_ref().is_some_and(LoadOutcome::changes_state) {
            rerender.force_update();
        }

        if let Some(LoadOutcome::Deferred { token, retry_after }) = outcome {
            let millis = u32::try_from(retry_after.as_millis()).unwrap_or(u32::MAX);
            TimeoutFuture::new(millis).await;
            spawn_load(loader, rerender, LoadRequest::Retry(token));
        }
    });
}

struct Observation {
    observer: IntersectionObserver,
    id: ObservationId,
    // Kept alive for as long as the observer may call it
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

fn observe<T>(
    target: &NodeRef,
    loader: ListLoader<T>,
    rerender: UseForceUpdateHandle,
) -> Option<Observation>
where
    T: DeserializeOwned + 'static,
{
    let element = target.cast::<Element>()?;
    let root_margin: RootMargin = loader.config().root_margin;
    let (id, _) = loader.attach_sentinel();

    let callback = {
        let loader = loader.clone();
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer| {
                let visible = entries.iter().any(|entry| {
                    entry
                        .unchecked_into::<IntersectionObserverEntry>()
                        .is_intersecting()
                });
                if visible {
                    spawn_load(
                        loader.clone(),
                        rerender.clone(),
                        LoadRequest::Visible(id),
                    );
                }
            },
        )
    };

    let init = IntersectionObserverInit::new();
    init.set_root_margin(root_margin.as_str());
    let observer = match IntersectionObserver::new_with_options(
        callback.as_ref().unchecked_ref(),
        &init,
    ) {
        Ok(observer) => observer,
        Err(e) => {
            tracing::error!("Failed to create IntersectionObserver: {e:?}");
            loader.detach_sentinel(id);
            return None;
        }
    };
    observer.observe(&element);

    Some(Observation {
        observer,
        id,
        _callback: callback,
    })
}
