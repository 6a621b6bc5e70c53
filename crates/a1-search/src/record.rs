//! Dynamic records and dotted field paths.
//!
//! Records arriving from a data feed have no fixed schema. A [`Record`] wraps
//! a JSON object and resolves dotted paths such as `player.team` or
//! `props.confidence` into runtime [`Value`]s.
//!
//! Path rules:
//!
//! - an object segment looks up a key
//! - a numeric segment on an array indexes it (`props.0.line`)
//! - any other segment on an array fans out over every element and the
//!   results are gathered into a [`Value::List`]
//! - anything missing, null or of the wrong shape resolves to [`Value::None`]
//! - the path [`ALL_VALUES`] (`*`) gathers every scalar leaf of the record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::traits::Searchable;
use crate::value::Value;

/// Path that resolves to every non-null scalar in a record, depth first.
///
/// Text search falls back to it when no fields are named. Custom accessors
/// may support it too; those that return [`Value::None`] simply never match.
pub const ALL_VALUES: &str = "*";

/// A schemaless record backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Json>);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Record::default()
    }

    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_json(json: Json) -> Option<Self> {
        match json {
            Json::Object(map) => Some(Record(map)),
            _ => None,
        }
    }

    /// Sets a top-level field, returning the record for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Resolves a dotted path against this record.
    pub fn get(&self, path: &str) -> Value<'_> {
        resolve_in_map(&self.0, path)
    }

    /// Returns the record's identifier, taken from its `id` field.
    ///
    /// String ids are returned as-is and numeric ids are rendered in decimal.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Json::String(s) => Some(s.clone()),
            Json::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Borrows the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Json> {
        &self.0
    }

    /// Consumes the record, returning the underlying JSON object.
    pub fn into_map(self) -> Map<String, Json> {
        self.0
    }
}

impl From<Map<String, Json>> for Record {
    fn from(map: Map<String, Json>) -> Self {
        Record(map)
    }
}

impl Searchable for Record {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field)
    }
}

impl Searchable for Json {
    fn field_value(&self, field: &str) -> Value<'_> {
        resolve(self, field)
    }
}

/// Resolves a dotted path against an arbitrary JSON value.
pub fn resolve<'a>(root: &'a Json, path: &str) -> Value<'a> {
    if path.is_empty() {
        return Value::None;
    }
    if path == ALL_VALUES {
        let mut out = Vec::new();
        collect_leaves(root, &mut out);
        return Value::List(out);
    }
    let segments: Vec<&str> = path.split('.').collect();
    resolve_segments(root, &segments)
}

fn resolve_in_map<'a>(map: &'a Map<String, Json>, path: &str) -> Value<'a> {
    if path.is_empty() {
        return Value::None;
    }
    if path == ALL_VALUES {
        let mut out = Vec::new();
        map.values().for_each(|node| collect_leaves(node, &mut out));
        return Value::List(out);
    }
    let segments: Vec<&str> = path.split('.').collect();
    match map.get(segments[0]) {
        Some(node) => resolve_segments(node, &segments[1..]),
        None => Value::None,
    }
}

fn collect_leaves<'a>(node: &'a Json, out: &mut Vec<Value<'a>>) {
    match node {
        Json::Null => {}
        Json::Object(map) => map.values().for_each(|child| collect_leaves(child, out)),
        Json::Array(items) => items.iter().for_each(|child| collect_leaves(child, out)),
        scalar => out.push(Value::from_json(scalar)),
    }
}

fn resolve_segments<'a>(node: &'a Json, segments: &[&str]) -> Value<'a> {
    let Some((head, rest)) = segments.split_first() else {
        return Value::from_json(node);
    };

    match node {
        Json::Object(map) => match map.get(*head) {
            Some(child) => resolve_segments(child, rest),
            None => Value::None,
        },
        Json::Array(items) => match head.parse::<usize>() {
            Ok(index) => match items.get(index) {
                Some(child) => resolve_segments(child, rest),
                None => Value::None,
            },
            Err(_) => Value::List(
                items
                    .iter()
                    .map(|item| resolve_segments(item, segments))
                    .filter(|v| !v.is_none())
                    .collect(),
            ),
        },
        _ => Value::None,
    }
}
