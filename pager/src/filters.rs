use payloads::Filters;

/// Tracks which dataset a loader is paging through.
#[derive(Debug, Clone, Default)]
pub struct FilterResetter {
    current: Filters,
}

impl FilterResetter {
    pub fn new(filters: Filters) -> Self {
        Self { current: filters }
    }

    pub fn current(&self) -> &Filters {
        &self.current
    }

    /// Store `filters` and report whether they name a different dataset.
    pub fn update(&mut self, filters: Filters) -> bool {
        if filters == self.current {
            return false;
        }
        tracing::info!(from = ?self.current, to = ?filters, "Filters changed");
        self.current = filters;
        true
    }
}
