use jiff::{SignedDuration, Timestamp};
use std::time::Duration;

/// Identifies one deferred retry. Only the most recent one is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("deferral#{seq}")]
pub struct DeferToken {
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Open,
    /// Too soon after the last fetch; try again after `retry_after`.
    Deferred {
        token: DeferToken,
        retry_after: Duration,
    },
}

/// Keeps fetch starts at least `window` apart.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    window: Duration,
    last_start: Option<Timestamp>,
    latest_deferral: u64,
}

impl ThrottleGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_start: None,
            latest_deferral: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decide whether a fetch may start at `now`. A closed gate hands out a
    /// new token, superseding any earlier one.
    pub fn check(&mut self, now: Timestamp) -> GateDecision {
        let Some(last_start) = self.last_start else {
            return GateDecision::Open;
        };

        let window = SignedDuration::try_from(self.window)
            .unwrap_or(SignedDuration::MAX);
        if now.duration_since(last_start) >= window {
            return GateDecision::Open;
        }

        self.latest_deferral += 1;
        GateDecision::Deferred {
            token: DeferToken {
                seq: self.latest_deferral,
            },
            retry_after: self.window,
        }
    }

    /// Record a fetch start. Pending deferrals are satisfied by it.
    pub fn mark_started(&mut self, now: Timestamp) {
        self.last_start = Some(now);
        self.latest_deferral += 1;
    }

    pub fn is_current(&self, token: &DeferToken) -> bool {
        token.seq == self.latest_deferral
    }

    /// Forget the last start and drop outstanding deferrals.
    pub fn reset(&mut self) {
        self.last_start = None;
        self.latest_deferral += 1;
    }
}
