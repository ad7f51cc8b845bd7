use jiff::Timestamp;
#[cfg(any(test, feature = "mock-time"))]
use std::sync::{Arc, Mutex};

/// The clock the loader throttles against.
#[derive(Clone, Default)]
pub struct TimeSource {
    #[cfg(any(test, feature = "mock-time"))]
    mocked: Option<Arc<Mutex<Timestamp>>>,
}

impl TimeSource {
    /// The real wall clock.
    pub fn system() -> Self {
        Self::default()
    }

    #[cfg(any(test, feature = "mock-time"))]
    pub fn mock(initial_time: Timestamp) -> Self {
        Self {
            mocked: Some(Arc::new(Mutex::new(initial_time))),
        }
    }

    pub fn now(&self) -> Timestamp {
        #[cfg(any(test, feature = "mock-time"))]
        if let Some(time) = &self.mocked {
            return *time.lock().unwrap();
        }
        Timestamp::now()
    }

    /// Move a mocked clock forward. No effect on the wall clock.
    #[cfg(any(test, feature = "mock-time"))]
    pub fn advance(&self, duration: jiff::Span) {
        if let Some(time) = &self.mocked {
            *time.lock().unwrap() += duration;
        }
    }

    #[cfg(any(test, feature = "mock-time"))]
    pub fn set(&self, time: Timestamp) {
        if let Some(current) = &self.mocked {
            *current.lock().unwrap() = time;
        }
    }
}
