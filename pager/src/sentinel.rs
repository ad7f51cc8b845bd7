use crate::LoaderState;

/// One registration of the sentinel element with a visibility observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("observation#{_0}")]
pub struct ObservationId(u64);

/// Bookkeeping for the element placed after the last rendered item.
///
/// At most one observation is live. Events from a replaced observation are
/// ignored so a re-render can never double-trigger a load.
#[derive(Debug, Default)]
pub struct Sentinel {
    next_id: u64,
    active: Option<ObservationId>,
}

impl Sentinel {
    /// Start a new observation. Returns it along with the observation it
    /// replaces, which the caller must disconnect.
    pub fn attach(&mut self) -> (ObservationId, Option<ObservationId>) {
        self.next_id += 1;
        let id = ObservationId(self.next_id);
        let replaced = self.active.replace(id);
        if let Some(old) = replaced {
            tracing::debug!(%old, new = %id, "Re-attaching sentinel");
        }
        (id, replaced)
    }

    /// End `id` if it is still the live observation.
    pub fn detach(&mut self, id: ObservationId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<ObservationId> {
        self.active
    }

    /// Whether a visibility event should start a load.
    pub fn should_load<T>(
        &self,
        id: ObservationId,
        is_intersecting: bool,
        state: &LoaderState<T>,
        in_flight: bool,
    ) -> bool {
        self.active == Some(id) && is_intersecting && state.has_more && !in_flight
    }
}
