//! Runtime value types for field comparison.
//!
//! A [`Value`] is what a field resolves to when the engine looks at a record:
//! a scalar borrowed from the record, a list (arrays, or a path that fans out
//! across an array of objects), or [`Value::None`] when nothing is there.

use std::cmp::Ordering;

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use a1_search::{Value, Number};
///
/// struct Player {
///     name: String,
///     hotness: u8,
/// }
///
/// fn accessor<'a>(player: &'a Player, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&player.name),
///         "hotness" => Value::Number(Number::U64(player.hotness as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// Ordered collection of values.
    List(Vec<Value<'a>>),
    /// Field not present, null, or unsupported.
    None,
}

impl<'a> Value<'a> {
    /// Converts a JSON value into a borrowed runtime value.
    ///
    /// Objects have no scalar meaning and resolve to [`Value::None`].
    pub fn from_json(json: &'a serde_json::Value) -> Value<'a> {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(Number::from_json(n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(_) => Value::None,
        }
    }

    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this is a `List` value.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Views the value as a list of elements.
    ///
    /// A list yields its items, a scalar yields itself as a single element,
    /// and `None` yields nothing.
    pub fn elements(&self) -> &[Value<'a>] {
        match self {
            Value::List(items) => items,
            Value::None => &[],
            scalar => std::slice::from_ref(scalar),
        }
    }

    /// Collapses the value into a single sort key.
    ///
    /// Lists resolve to their greatest element (nested lists are flattened,
    /// missing and incomparable elements ignored). An empty list resolves to
    /// `None`. Scalars are returned unchanged.
    pub fn max_element(&self) -> Value<'a> {
        match self {
            Value::List(items) => items
                .iter()
                .map(Value::max_element)
                .filter(|v| !v.is_none())
                .fold(Value::None, |best, candidate| {
                    match compare_scalars(&candidate, &best) {
                        Some(Ordering::Greater) => candidate,
                        _ if best.is_none() => candidate,
                        _ => best,
                    }
                }),
            scalar => scalar.clone(),
        }
    }

    /// Returns a short name for the value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::None => "none",
        }
    }
}

/// Compares two scalar values of the same kind.
///
/// Returns `None` for mismatched kinds, lists, missing values, or NaN.
pub(crate) fn compare_scalars(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Numeric value preserving the precision of its source.
///
/// Integers compare exactly across `I64` and `U64`; comparisons involving a
/// float convert to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(match u64::try_from(a) {
                Ok(a) => a.cmp(&b),
                Err(_) => Ordering::Less,
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn from_json(n: &serde_json::Number) -> Number {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// Game start times and line movements are compared through this type when
/// records come from typed structs. JSON records carry dates as ISO-8601
/// strings, which order correctly as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}
