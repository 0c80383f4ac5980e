//! Normalization of API response bodies.
//!
//! The API answers with one of three shapes: a single object, a bare array,
//! or a cursor-paginated envelope `{"results": [...], "next": ...}`. All of
//! them are collapsed into a [`ListResult`].

use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResult {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl ListResult {
    pub fn from_body(raw: Value) -> Self {
        match raw {
            Value::Object(mut map) if map.contains_key("results") => {
                let items = match map.remove("results") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                let next_cursor = match map.remove("next") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s),
                    Some(other) => Some(other.to_string()),
                };
                Self { items, next_cursor }
            }
            Value::Object(map) => Self {
                items: vec![Value::Object(map)],
                next_cursor: None,
            },
            Value::Array(items) => Self {
                items,
                next_cursor: None,
            },
            _ => Self::default(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Concatenate another page onto this one.
    pub fn append(&mut self, more: Vec<Value>) {
        self.items.extend(more);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn normalize(raw: Value) -> ListResult {
    ListResult::from_body(raw)
}

pub fn normalize_single(raw: Value) -> Value {
    raw
}

/// Extract the token to send back as `cursor`.
///
/// `next` is either the token itself or a full URL carrying a `cursor` parameter.
pub fn cursor_token(next: &str) -> String {
    Url::parse(next)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "cursor")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_else(|| next.to_string())
}
