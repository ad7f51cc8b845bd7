//! Cursor-paginated list loading for infinite-scroll views.
//!
//! [`Pager`] is the state machine: it decides when a page may be fetched,
//! merges results by item id and resets when the filters change.
//! [`Loader`] runs it against a [`PageSource`], usually [`HttpSource`].
//! Neither knows about the DOM; the UI supplies visibility events for the
//! sentinel and timers for deferred retries.

mod config;
mod cursor;
mod error;
mod filters;
mod loader;
mod machine;
mod sentinel;
mod throttle;
mod time;

pub use config::{
    ConfigError, DEFAULT_ROOT_MARGIN, DEFAULT_THROTTLE, ErrorMessages,
    LoaderConfig, LoaderConfigBuilder, RootMargin,
};
pub use cursor::{CursorController, ItemIdFn, LoaderState};
pub use error::LoadError;
pub use filters::FilterResetter;
pub use loader::{HttpSource, LoadOutcome, Loader, PageSource};
pub use machine::{Completion, LoadStart, PageTicket, Pager, Phase, SkipReason};
pub use sentinel::{ObservationId, Sentinel};
pub use throttle::{DeferToken, GateDecision, ThrottleGate};
pub use time::TimeSource;
