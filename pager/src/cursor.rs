use crate::LoadError;
use payloads::{Filters, PageRequest, PageResponse};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;

/// Extracts the unique id of a list item.
pub type ItemIdFn<T> = Rc<dyn Fn(&T) -> String>;

/// What a list view renders: everything loaded so far and where paging
/// stands.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderState<T> {
    /// In arrival order, unique by id.
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<LoadError>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub total_count: Option<u64>,
}

impl<T> LoaderState<T> {
    /// The state of a loader that is about to fetch its first page.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            next_cursor: None,
            has_more: true,
            total_count: None,
        }
    }
}

impl<T> Default for LoaderState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds fetched pages into a [`LoaderState`].
pub struct CursorController<T> {
    state: LoaderState<T>,
    seen: HashSet<String>,
    item_id: ItemIdFn<T>,
    pages_loaded: u32,
}

impl<T> CursorController<T> {
    pub fn new(item_id: ItemIdFn<T>) -> Self {
        Self {
            state: LoaderState::new(),
            seen: HashSet::new(),
            item_id,
            pages_loaded: 0,
        }
    }

    pub fn state(&self) -> &LoaderState<T> {
        &self.state
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    pub fn next_request(&self, limit: NonZeroU32, filters: &Filters) -> PageRequest {
        match &self.state.next_cursor {
            Some(cursor) => PageRequest::after(cursor, limit, filters.clone()),
            None => PageRequest::first(limit, filters.clone()),
        }
    }

    pub fn begin(&mut self) {
        self.state.loading = true;
    }

    /// Nothing is being fetched any more.
    pub fn finish(&mut self) {
        self.state.loading = false;
    }

    /// Append the unseen items of `page`, returning how many were new.
    pub fn apply_page(&mut self, page: PageResponse<T>) -> usize {
        let received = page.items.len();
        let next_cursor = page.next_cursor().map(str::to_string);
        let mut has_more = page.has_more;

        let before = self.state.items.len();
        for item in page.items {
            if self.seen.insert((self.item_id)(&item)) {
                self.state.items.push(item);
            }
        }
        let added = self.state.items.len() - before;

        // A later page may leave the total out; keep what we knew.
        if let Some(total) = page.total {
            self.state.total_count = Some(total);
        }

        // Without a cursor the next request would be page 1 again.
        if has_more && next_cursor.is_none() {
            tracing::warn!("Endpoint reported more items without a cursor");
            has_more = false;
        }

        self.state.next_cursor = next_cursor;
        self.state.has_more = has_more;
        self.finish();
        self.pages_loaded += 1;

        tracing::debug!(
            received,
            added,
            duplicates = received - added,
            has_more,
            "Merged page {}",
            self.pages_loaded
        );
        added
    }

    /// Record a failed page. Items already loaded stay.
    pub fn apply_failure(&mut self, error: LoadError) {
        self.state.error = Some(error);
        self.state.has_more = false;
        self.finish();
    }

    /// Back to an empty first-page state.
    pub fn clear(&mut self) {
        self.state = LoaderState::new();
        self.seen.clear();
        self.pages_loaded = 0;
    }
}
