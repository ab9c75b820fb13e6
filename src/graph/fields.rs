//! Null-safe field access over raw resource items
//!
//! Listed resources arrive as loosely-typed JSON. Every accessor here answers
//! `None` or an empty collection when a field is absent, `null`, or of an
//! unexpected type; nothing in this module fails.

use crate::graph::model::Labels;
use serde_json::Value;

/// Items of a list document
///
/// A missing or `null` `items` field is an empty collection. Any other
/// non-array value means the document is not a list at all.
pub fn list_items(list: &Value) -> Option<&[Value]> {
    match list.get("items") {
        None | Some(Value::Null) => Some(&[] as &[Value]),
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(_) => None,
    }
}

/// Borrowed view of one raw resource item
#[derive(Debug, Clone, Copy)]
pub struct ResourceItem<'a>(&'a Value);

impl<'a> ResourceItem<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Walk a path of object keys
    pub fn value_at(&self, path: &[&str]) -> Option<&'a Value> {
        path.iter()
            .try_fold(self.0, |current, key| current.get(*key))
            .filter(|value| !value.is_null())
    }

    pub fn str_at(&self, path: &[&str]) -> Option<&'a str> {
        self.value_at(path).and_then(|v| v.as_str())
    }

    pub fn i64_at(&self, path: &[&str]) -> Option<i64> {
        self.value_at(path).and_then(|v| v.as_i64())
    }

    pub fn array_at(&self, path: &[&str]) -> &'a [Value] {
        self.value_at(path)
            .and_then(|v| v.as_array())
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    /// Label-style map at `path`, values untouched
    pub fn labels_at(&self, path: &[&str]) -> Labels {
        self.value_at(path)
            .and_then(|v| v.as_object())
            .map(|map| {
                map.iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.str_at(&["metadata", "name"])
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.str_at(&["metadata", "namespace"])
    }

    pub fn labels(&self) -> Labels {
        self.labels_at(&["metadata", "labels"])
    }
}
