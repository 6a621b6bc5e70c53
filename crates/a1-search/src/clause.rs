//! Clause types for filter predicates.
//!
//! A [`Clause`] is one filter predicate: a field path, an operator and the
//! value to compare against. Clauses fail closed: a missing field, a value of
//! the wrong shape, or a clause marked [`ClauseValue::Malformed`] never
//! matches.

use std::cmp::Ordering;

use regex::Regex;

use crate::op::Op;
use crate::score::score;
use crate::value::{compare_scalars, Number, Timestamp, Value};

/// A single filter predicate.
///
/// ```
/// use a1_search::{Clause, Op, ClauseValue, Value};
///
/// let teams = Clause::new("team", Op::Includes, vec!["BOS", "GSW"]);
/// assert!(teams.matches(&Value::String("GSW")));
/// assert!(!teams.matches(&Value::String("LAL")));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field path to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates a clause that never matches, recording why.
    pub fn malformed(field: impl Into<String>, op: Op, reason: impl Into<String>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: ClauseValue::Malformed(reason.into()),
        }
    }

    /// Returns `true` if this clause can never match.
    pub fn is_malformed(&self) -> bool {
        matches!(self.value, ClauseValue::Malformed(_))
    }

    /// Evaluates this clause against a resolved field value.
    pub fn matches(&self, field: &Value<'_>) -> bool {
        if field.is_none() || self.is_malformed() {
            return false;
        }

        match self.op {
            Op::Equals => self.value.equals(field),
            Op::NotEquals => !self.value.equals(field),
            Op::Includes => self.match_includes(field),
            Op::Range => self.match_range(field),
            Op::MinThreshold => self.match_threshold(field),
            Op::Contains | Op::NotContains | Op::StartsWith | Op::EndsWith => {
                self.match_string(field)
            }
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => self.match_ordering(field),
            Op::In => self.match_in(field),
            Op::NotIn => match &self.value {
                ClauseValue::List(set) if !field.is_list() => !set.iter().any(|v| v.equals(field)),
                _ => false,
            },
            Op::Regex => match (&self.value, field) {
                (ClauseValue::Regex(regex), Value::String(s)) => regex.is_match(s),
                _ => false,
            },
            Op::Fuzzy => self.match_fuzzy(field),
        }
    }

    fn match_includes(&self, field: &Value<'_>) -> bool {
        let present = field.elements();
        match &self.value {
            ClauseValue::List(wanted) => wanted
                .iter()
                .any(|w| present.iter().any(|element| w.equals(element))),
            single => present.iter().any(|element| single.equals(element)),
        }
    }

    fn match_range(&self, field: &Value<'_>) -> bool {
        let ClauseValue::Range { min, max } = &self.value else {
            return false;
        };
        if field.is_list() {
            return false;
        }
        let above_min = match min {
            Some(bound) => matches!(
                bound.compare_with(field),
                Some(Ordering::Less | Ordering::Equal)
            ),
            None => true,
        };
        let below_max = match max {
            Some(bound) => matches!(
                bound.compare_with(field),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            None => true,
        };
        above_min && below_max
    }

    fn match_threshold(&self, field: &Value<'_>) -> bool {
        let ClauseValue::Number(threshold) = &self.value else {
            return false;
        };
        field
            .elements()
            .iter()
            .filter_map(|element| element.max_element().as_number())
            .any(|n| matches!(n.compare(*threshold), Some(Ordering::Greater | Ordering::Equal)))
    }

    fn match_string(&self, field: &Value<'_>) -> bool {
        let (ClauseValue::String(pattern), Value::String(s)) = (&self.value, field) else {
            return false;
        };
        match self.op {
            Op::Contains => s.contains(pattern.as_str()),
            Op::NotContains => !s.contains(pattern.as_str()),
            Op::StartsWith => s.starts_with(pattern.as_str()),
            Op::EndsWith => s.ends_with(pattern.as_str()),
            _ => false,
        }
    }

    fn match_fuzzy(&self, field: &Value<'_>) -> bool {
        let ClauseValue::String(text) = &self.value else {
            return false;
        };
        field
            .elements()
            .iter()
            .filter_map(Value::as_str)
            .any(|candidate| score(text, candidate) > 0.0)
    }

    fn match_ordering(&self, field: &Value<'_>) -> bool {
        match self.value.compare_with(field) {
            // compare_with orders the clause value against the field; flip it
            Some(ordering) => self.op.eval_ordering(ordering.reverse()),
            None => false,
        }
    }

    fn match_in(&self, field: &Value<'_>) -> bool {
        match &self.value {
            ClauseValue::List(set) if !field.is_list() => set.iter().any(|v| v.equals(field)),
            _ => false,
        }
    }
}

/// Owned comparison value stored in a clause.
///
/// Unlike [`Value`], which borrows from a record, `ClauseValue` owns its data
/// so queries can outlive the records they run against.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// List of values (`includes` intersections, `in` sets, list equality).
    List(Vec<ClauseValue>),
    /// Inclusive range; a missing bound is unbounded.
    Range {
        /// Lower bound.
        min: Option<Box<ClauseValue>>,
        /// Upper bound.
        max: Option<Box<ClauseValue>>,
    },
    /// Compiled regular expression.
    Regex(Regex),
    /// A criterion that could not be understood. Never matches.
    Malformed(String),
}

impl ClauseValue {
    /// Builds an inclusive range value.
    pub fn range(min: impl Into<ClauseValue>, max: impl Into<ClauseValue>) -> Self {
        ClauseValue::Range {
            min: Some(Box::new(min.into())),
            max: Some(Box::new(max.into())),
        }
    }

    /// Converts a JSON value into a clause value.
    ///
    /// Returns `None` for nulls and objects, which have no comparison meaning
    /// outside of range bounds.
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
            serde_json::Value::Bool(b) => Some(ClauseValue::Bool(*b)),
            serde_json::Value::Number(_) => Value::from_json(json)
                .as_number()
                .map(ClauseValue::Number),
            serde_json::Value::String(s) => Some(ClauseValue::String(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(ClauseValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(ClauseValue::List),
        }
    }

    /// Deep equality against a field value.
    ///
    /// Numbers compare across integer and float representations; lists
    /// compare element-wise.
    pub fn equals(&self, field: &Value<'_>) -> bool {
        match (self, field) {
            (ClauseValue::String(a), Value::String(b)) => a == b,
            (ClauseValue::Number(a), Value::Number(b)) => a.compare(*b) == Some(Ordering::Equal),
            (ClauseValue::Timestamp(a), Value::Timestamp(b)) => a == b,
            (ClauseValue::Bool(a), Value::Bool(b)) => a == b,
            (ClauseValue::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            _ => false,
        }
    }

    /// Orders this (scalar) clause value against a scalar field value.
    fn compare_with(&self, field: &Value<'_>) -> Option<Ordering> {
        compare_scalars(&self.as_value()?, field)
    }

    fn as_value(&self) -> Option<Value<'_>> {
        match self {
            ClauseValue::String(s) => Some(Value::String(s)),
            ClauseValue::Number(n) => Some(Value::Number(*n)),
            ClauseValue::Timestamp(t) => Some(Value::Timestamp(*t)),
            ClauseValue::Bool(b) => Some(Value::Bool(*b)),
            _ => None,
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl<T: Into<ClauseValue>> From<Vec<T>> for ClauseValue {
    fn from(items: Vec<T>) -> Self {
        ClauseValue::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! clause_value_from_number {
    ($($t:ty),+) => {
        $(
            impl From<$t> for ClauseValue {
                fn from(n: $t) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )+
    };
}

clause_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
