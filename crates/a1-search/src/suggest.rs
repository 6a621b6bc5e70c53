//! Autocomplete suggestions for lookup boxes.

use crate::value::Value;

/// Distinct string values of `field` that contain `partial`, best first.
///
/// Matching is case-insensitive. Values that start with `partial` come first,
/// then shorter values, then case-insensitive alphabetical order. At most
/// `max` suggestions are returned.
///
/// ```
/// use a1_search::{suggest, Record, Searchable};
/// use serde_json::json;
///
/// let players: Vec<Record> = serde_json::from_value(json!([
///     {"name": "Jaylen Brown"}, {"name": "Jalen Brunson"}, {"name": "Bruce Brown"}
/// ])).unwrap();
///
/// let hits = suggest(&players, "name", "bru", 5, Record::accessor);
/// assert_eq!(hits, vec!["Bruce Brown", "Jalen Brunson"]);
/// ```
pub fn suggest<T, F>(items: &[T], field: &str, partial: &str, max: usize, accessor: F) -> Vec<String>
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    let needle = partial.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for item in items {
        let value = accessor(item, field);
        for element in value.elements() {
            let Some(text) = element.as_str() else {
                continue;
            };
            if text.to_lowercase().contains(&needle) && !found.iter().any(|f| f == text) {
                found.push(text.to_string());
            }
        }
    }

    found.sort_by_cached_key(|s| {
        let lower = s.to_lowercase();
        (!lower.starts_with(&needle), s.chars().count(), lower)
    });
    found.truncate(max);
    found
}
