use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One page of a cursor-paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
    /// Size of the whole dataset, if the endpoint reported it.
    pub total: Option<u64>,
}

impl<T> PageResponse<T> {
    /// The cursor for the following page. A cursor sent alongside
    /// `hasMore: false` is ignored.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("Invalid item at index {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a list endpoint's body into a page.
///
/// Endpoints name their array differently (`data`, `items`, or after the
/// resource, like `players` or `scouts`). `data` wins over `items`, and if
/// neither holds an array the first array-valued property in document
/// order is used. Keep this the only place that knows about those shapes.
pub fn decode_page<T: DeserializeOwned>(
    body: Value,
) -> Result<PageResponse<T>, DecodeError> {
    let Value::Object(mut object) = body else {
        return Err(DecodeError::NotAnObject(json_kind(&body)));
    };

    let has_more = matches!(object.get("hasMore"), Some(Value::Bool(true)));
    let next_cursor = object.get("nextCursor").and_then(cursor_string);
    let total = object
        .get("total")
        .and_then(Value::as_u64)
        .or_else(|| object.get("totalCount").and_then(Value::as_u64));

    let items = take_items(&mut object)
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| DecodeError::Item { index, source })
        })
        .collect::<Result<Vec<T>, _>>()?;

    Ok(PageResponse {
        items,
        has_more,
        next_cursor,
        total,
    })
}

fn take_items(object: &mut Map<String, Value>) -> Vec<Value> {
    let key = ["data", "items"]
        .into_iter()
        .find(|key| matches!(object.get(*key), Some(Value::Array(_))))
        .map(str::to_string)
        .or_else(|| {
            object
                .iter()
                .find(|(_, value)| value.is_array())
                .map(|(key, _)| key.clone())
        });

    match key.and_then(|key| object.remove(&key)) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Cursors are opaque strings, but some endpoints send numeric ids.
fn cursor_string(value: &Value) -> Option<String> {
    match value {
        Value::String(cursor) if !cursor.is_empty() => Some(cursor.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
