use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

/// Page size used when a caller does not pick one.
pub const DEFAULT_PAGE_LIMIT: NonZeroU32 = NonZeroU32::new(50).unwrap();

/// A scalar filter value as sent in a list query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FilterValue {
    /// Blank values are left out of the query entirely.
    ///
    /// Only the empty string counts as blank text; whitespace is sent as-is.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            // f64's Display already drops a trailing ".0"
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<V: Into<FilterValue>> From<Option<V>> for FilterValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// The filter set of a list view.
///
/// Two filter sets are the same dataset only if every key maps to an equal
/// value; `Text("1")` and `Int(1)` are different values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<String, FilterValue>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key/value pairs that should reach the server.
    pub fn query_pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.0
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(key, value)| (key.clone(), value.to_string()))
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// One request against a cursor-paginated list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// `None` for the first page.
    pub cursor: Option<String>,
    pub limit: NonZeroU32,
    pub filters: Filters,
}

impl PageRequest {
    pub fn first(limit: NonZeroU32, filters: Filters) -> Self {
        Self {
            cursor: None,
            limit,
            filters,
        }
    }

    pub fn after(
        cursor: impl Into<String>,
        limit: NonZeroU32,
        filters: Filters,
    ) -> Self {
        Self {
            cursor: Some(cursor.into()),
            limit,
            filters,
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.cursor.is_none()
    }

    /// Query string pairs in wire order: cursor, limit, then filters.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.0.len() + 2);
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}
