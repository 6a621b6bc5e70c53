//! Sort specifications and the stable comparator stage.
//!
//! Sort keys are resolved once per record. A list-valued key collapses to its
//! greatest element, which is how "hottest opportunity first" ordering works
//! over a record's `props.confidence`. Records without a key keep their
//! relative order and go after every keyed record, in both directions.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Non-decreasing order.
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    /// Non-increasing order.
    #[serde(alias = "descending")]
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// A sort specification: a field path and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field path to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(rename = "direction", default)]
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Compares two resolved sort keys under this ordering.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        compare_keys(a, b, self.dir)
    }
}

/// Collapses a field value into a sort key.
pub fn sort_key<'a>(value: &Value<'a>) -> Value<'a> {
    value.max_element()
}

/// Compares two sort keys.
///
/// Missing keys sort last regardless of direction. Keys of different kinds
/// are grouped by kind (numbers, strings, timestamps, booleans) so the order
/// stays total. Numbers compare by value (integers exactly) with NaN after
/// every other number.
pub fn compare_keys(a: &Value<'_>, b: &Value<'_>, dir: Dir) -> Ordering {
    match (a.is_none(), b.is_none()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => dir.apply(compare_present(a, b)),
    }
}

fn compare_present(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .compare(*y)
            .unwrap_or_else(|| x.to_f64().total_cmp(&y.to_f64())),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Timestamp(_) => 2,
        Value::Bool(_) => 3,
        Value::List(_) => 4,
        Value::None => 5,
    }
}

/// Sorts items by a chain of orderings, stably.
///
/// The first ordering is the primary key; later ones break ties. Items equal
/// under every ordering keep their input order.
pub fn sort_by_orderings<'a, T, F>(items: Vec<&'a T>, orderings: &[OrderBy], accessor: &F) -> Vec<&'a T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    if orderings.is_empty() {
        return items;
    }

    let mut keyed: Vec<(Vec<Value<'a>>, &'a T)> = items
        .into_iter()
        .map(|item| {
            let keys = orderings
                .iter()
                .map(|order| sort_key(&accessor(item, &order.field)))
                .collect();
            (keys, item)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        orderings
            .iter()
            .zip(a.iter().zip(b))
            .map(|(order, (ka, kb))| order.compare(ka, kb))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Sorts a slice by a single specification, returning references in order.
///
/// ```
/// use a1_search::{sort, OrderBy, Record, Searchable};
/// use serde_json::json;
///
/// let players: Vec<Record> = serde_json::from_value(json!([
///     {"name": "Stephen Curry", "hotness": 88},
///     {"name": "LeBron James", "hotness": 94}
/// ])).unwrap();
///
/// let sorted = sort(&players, &OrderBy::desc("hotness"), Record::accessor);
/// assert_eq!(sorted[0].get("name").as_str(), Some("LeBron James"));
/// ```
pub fn sort<'a, T, F>(items: &'a [T], spec: &OrderBy, accessor: F) -> Vec<&'a T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    sort_by_orderings(
        items.iter().collect(),
        std::slice::from_ref(spec),
        &accessor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::traits::Searchable;
    use crate::value::{Number, Timestamp};
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn names<'a>(sorted: &[&'a Record]) -> Vec<&'a str> {
        sorted
            .iter()
            .map(|r| r.get("name").as_str().unwrap_or("?"))
            .collect()
    }

    #[test]
    fn dir_apply_and_parse() {
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!("descending".parse::<Dir>(), Ok(Dir::Desc));
        assert_eq!("ASC".parse::<Dir>(), Ok(Dir::Asc));
        assert!("sideways".parse::<Dir>().is_err());
        assert_eq!(Dir::Desc.to_string(), "desc");
    }

    #[test]
    fn order_by_wire_form() {
        let spec: OrderBy =
            serde_json::from_value(json!({"field": "hotness", "direction": "descending"})).unwrap();
        assert_eq!(spec, OrderBy::desc("hotness"));

        let default_dir: OrderBy = serde_json::from_value(json!({"field": "name"})).unwrap();
        assert_eq!(default_dir, OrderBy::asc("name"));
    }

    #[test]
    fn hotness_descending() {
        let players = records(json!([
            {"name": "Stephen Curry", "hotness": 88},
            {"name": "LeBron James", "hotness": 94}
        ]));
        let sorted = sort(&players, &OrderBy::desc("hotness"), Record::accessor);
        assert_eq!(names(&sorted), vec!["LeBron James", "Stephen Curry"]);
    }

    #[test]
    fn strings_use_code_point_order() {
        let players = records(json!([
            {"name": "alpha"}, {"name": "Zulu"}, {"name": "Bravo"}
        ]));
        let asc = sort(&players, &OrderBy::asc("name"), Record::accessor);
        assert_eq!(names(&asc), vec!["Bravo", "Zulu", "alpha"]);

        let desc = sort(&players, &OrderBy::desc("name"), Record::accessor);
        assert_eq!(names(&desc), vec!["alpha", "Zulu", "Bravo"]);
    }

    #[test]
    fn list_keys_sort_by_maximum() {
        let games = records(json!([
            {"name": "cold", "props": [{"confidence": 0.55}, {"confidence": 0.61}]},
            {"name": "hot", "props": [{"confidence": 0.40}, {"confidence": 0.97}]},
            {"name": "warm", "props": [{"confidence": 0.80}]}
        ]));
        let sorted = sort(&games, &OrderBy::desc("props.confidence"), Record::accessor);
        assert_eq!(names(&sorted), vec!["hot", "warm", "cold"]);
    }

    #[test]
    fn missing_keys_go_last_both_ways() {
        let players = records(json!([
            {"name": "none-1"},
            {"name": "b", "hotness": 2},
            {"name": "empty", "hotness": []},
            {"name": "a", "hotness": 1}
        ]));
        let asc = sort(&players, &OrderBy::asc("hotness"), Record::accessor);
        assert_eq!(names(&asc), vec!["a", "b", "none-1", "empty"]);

        let desc = sort(&players, &OrderBy::desc("hotness"), Record::accessor);
        assert_eq!(names(&desc), vec!["b", "a", "none-1", "empty"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let players = records(json!([
            {"name": "first", "tier": 1},
            {"name": "second", "tier": 2},
            {"name": "third", "tier": 1},
            {"name": "fourth", "tier": 2}
        ]));
        let asc = sort(&players, &OrderBy::asc("tier"), Record::accessor);
        assert_eq!(names(&asc), vec!["first", "third", "second", "fourth"]);

        let desc = sort(&players, &OrderBy::desc("tier"), Record::accessor);
        assert_eq!(names(&desc), vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn secondary_ordering_breaks_ties() {
        let players = records(json!([
            {"name": "b", "tier": 1},
            {"name": "c", "tier": 2},
            {"name": "a", "tier": 1}
        ]));
        let sorted = sort_by_orderings(
            players.iter().collect(),
            &[OrderBy::asc("tier"), OrderBy::asc("name")],
            &Record::accessor,
        );
        assert_eq!(names(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn mixed_kinds_are_grouped() {
        let a = Value::Number(Number::I64(5));
        let b = Value::String("5");
        assert_eq!(compare_keys(&a, &b, Dir::Asc), Ordering::Less);
        assert_eq!(compare_keys(&a, &b, Dir::Desc), Ordering::Greater);
        assert_eq!(
            compare_keys(&Value::None, &Value::Timestamp(Timestamp(1)), Dir::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn integers_beyond_f64_precision_sort_by_value() {
        let rows = records(json!([
            {"name": "later", "id": 9_007_199_254_740_993u64},
            {"name": "earlier", "id": 9_007_199_254_740_992u64}
        ]));
        let sorted = sort(&rows, &OrderBy::asc("id"), Record::accessor);
        assert_eq!(names(&sorted), vec!["earlier", "later"]);
    }

    #[test]
    fn nan_sorts_after_numbers() {
        let nan = Value::Number(Number::F64(f64::NAN));
        let one = Value::Number(Number::F64(1.0));
        assert_eq!(compare_keys(&one, &nan, Dir::Asc), Ordering::Less);
    }

    #[test]
    fn no_orderings_is_identity() {
        let players = records(json!([{"name": "z"}, {"name": "a"}]));
        let same = sort_by_orderings(players.iter().collect(), &[], &Record::accessor);
        assert_eq!(names(&same), vec!["z", "a"]);
    }
}
