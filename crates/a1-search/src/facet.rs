//! Facet counts for filter sidebars.

use std::collections::HashMap;

use serde::Serialize;

use crate::value::Value;

/// Value counts for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    /// The field path counted.
    pub field: String,
    /// `(value, count)` pairs, most frequent first; ties in first-seen order.
    pub values: Vec<(String, usize)>,
}

impl Facet {
    /// Count for a given rendered value, if it appeared.
    pub fn count(&self, value: &str) -> Option<usize> {
        self.values
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, count)| *count)
    }
}

/// Counts the values of each field across `items`.
///
/// List values count every element; missing values are skipped.
pub fn facets<T, F>(items: &[T], fields: &[&str], accessor: F) -> Vec<Facet>
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    fields
        .iter()
        .map(|field| {
            let mut counts: Vec<(String, usize)> = Vec::new();
            // value -> slot in `counts`, which keeps first-seen order
            let mut slots: HashMap<String, usize> = HashMap::new();
            for item in items {
                let value = accessor(item, field);
                for element in value.elements() {
                    let Some(key) = facet_key(element) else {
                        continue;
                    };
                    match slots.get(&key) {
                        Some(&slot) => counts[slot].1 += 1,
                        None => {
                            slots.insert(key.clone(), counts.len());
                            counts.push((key, 1));
                        }
                    }
                }
            }
            // stable sort keeps first-seen order among equal counts
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            Facet {
                field: field.to_string(),
                values: counts,
            }
        })
        .collect()
}

fn facet_key(value: &Value<'_>) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Timestamp(t) => Some(t.as_millis().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::List(_) | Value::None => None,
    }
}
