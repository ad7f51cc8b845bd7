use crate::{
    CursorController, DeferToken, FilterResetter, GateDecision, ItemIdFn,
    LoadError, LoaderConfig, LoaderState, ObservationId, Sentinel,
    ThrottleGate,
};
use jiff::Timestamp;
use payloads::{ClientError, Filters, PageRequest, PageResponse};
use std::time::Duration;

/// Permission to run one fetch. Hand it back to [`Pager::complete`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageTicket {
    generation: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStart {
    Start(PageTicket),
    /// Throttled; the caller should retry once `retry_after` has passed.
    Deferred {
        token: DeferToken,
        retry_after: Duration,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SkipReason {
    #[display("a page is already loading")]
    InFlight,
    #[display("no more pages")]
    Exhausted,
    #[display("a newer retry replaced this one")]
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied { added: usize },
    Failed(LoadError),
    /// The loader was reset while this page was in flight.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading { page: u32 },
    Ready,
    Exhausted,
    Errored,
}

/// The loader state machine, free of any runtime or DOM.
///
/// At most one fetch is in flight per generation. Resetting (refresh or a
/// filter change) starts a new generation; completions from an older one
/// are dropped.
pub struct Pager<T> {
    config: LoaderConfig,
    cursor: CursorController<T>,
    gate: ThrottleGate,
    filters: FilterResetter,
    sentinel: Sentinel,
    generation: u64,
    in_flight: bool,
}

impl<T> Pager<T> {
    pub fn new(config: LoaderConfig, item_id: ItemIdFn<T>, filters: Filters) -> Self {
        let gate = ThrottleGate::new(config.throttle);
        Self {
            config,
            cursor: CursorController::new(item_id),
            gate,
            filters: FilterResetter::new(filters),
            sentinel: Sentinel::default(),
            generation: 0,
            in_flight: false,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn state(&self) -> &LoaderState<T> {
        self.cursor.state()
    }

    pub fn snapshot(&self) -> LoaderState<T>
    where
        T: Clone,
    {
        self.cursor.state().clone()
    }

    pub fn filters(&self) -> &Filters {
        self.filters.current()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        let state = self.cursor.state();
        if self.in_flight {
            Phase::Loading {
                page: self.cursor.pages_loaded() + 1,
            }
        } else if state.error.is_some() {
            Phase::Errored
        } else if !state.has_more {
            Phase::Exhausted
        } else if self.cursor.pages_loaded() == 0 {
            Phase::Empty
        } else {
            Phase::Ready
        }
    }

    /// Try to start the next page fetch at `now`.
    pub fn begin_load(&mut self, now: Timestamp) -> LoadStart {
        if self.in_flight {
            tracing::debug!("Skipping load: {}", SkipReason::InFlight);
            return LoadStart::Skipped(SkipReason::InFlight);
        }
        if !self.cursor.state().has_more {
            tracing::debug!("Skipping load: {}", SkipReason::Exhausted);
            return LoadStart::Skipped(SkipReason::Exhausted);
        }

        if let GateDecision::Deferred { token, retry_after } = self.gate.check(now)
        {
            tracing::debug!(%token, ?retry_after, "Throttled, deferring load");
            return LoadStart::Deferred { token, retry_after };
        }

        self.gate.mark_started(now);
        self.in_flight = true;
        self.cursor.begin();

        let request = self
            .cursor
            .next_request(self.config.limit, self.filters.current());
        tracing::debug!(
            generation = self.generation,
            cursor = ?request.cursor,
            "Loading page {}",
            self.cursor.pages_loaded() + 1
        );
        LoadStart::Start(PageTicket {
            generation: self.generation,
            request,
        })
    }

    /// Fold the result of a started fetch into the state.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<PageResponse<T>, ClientError>,
    ) -> Completion {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping page from a previous generation"
            );
            return Completion::Stale;
        }

        self.in_flight = false;
        match result {
            Ok(page) => Completion::Applied {
                added: self.cursor.apply_page(page),
            },
            Err(e) => {
                let error = LoadError::from_client(e, &self.config.messages);
                tracing::error!("Error loading {}: {error}", self.config.endpoint);
                self.cursor.apply_failure(error.clone());
                Completion::Failed(error)
            }
        }
    }

    /// Drop everything loaded and get ready to fetch page 1 again.
    pub fn reset(&mut self) {
        tracing::info!(
            endpoint = %self.config.endpoint,
            generation = self.generation + 1,
            "Resetting list"
        );
        self.generation += 1;
        self.in_flight = false;
        self.cursor.clear();
        self.gate.reset();
    }

    /// Drop everything loaded without planning another fetch.
    pub fn clear(&mut self) {
        self.reset();
        self.cursor.finish();
    }

    /// Switch to a new filter set, resetting if it differs by value.
    pub fn set_filters(&mut self, filters: Filters) -> bool {
        let changed = self.filters.update(filters);
        if changed {
            self.reset();
        }
        changed
    }

    /// Whether a deferred retry is still the one that should run.
    pub fn deferred_due(&self, token: &DeferToken) -> bool {
        self.gate.is_current(token)
    }

    pub fn attach_sentinel(&mut self) -> (ObservationId, Option<ObservationId>) {
        self.sentinel.attach()
    }

    pub fn detach_sentinel(&mut self, id: ObservationId) -> bool {
        self.sentinel.detach(id)
    }

    /// Whether a visibility event from `id` should start a load.
    pub fn sentinel_triggers(&self, id: ObservationId, is_intersecting: bool) -> bool {
        self.sentinel.should_load(
            id,
            is_intersecting,
            self.cursor.state(),
            self.in_flight,
        )
    }
}
