//! Filter operators.
//!
//! [`Op`] names how a clause compares a field against its value. Operator
//! names parse from the camelCase wire form used by filter criteria
//! (`"minThreshold"`), with snake_case and short aliases accepted.

use std::cmp::Ordering;
use std::str::FromStr;

/// Comparison operator for a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Deep equality.
    Equals,
    /// Deep inequality. A missing field still fails.
    NotEquals,
    /// Field (as a list) contains the value, or intersects a list value.
    Includes,
    /// Scalar field lies within an inclusive `[min, max]` range.
    Range,
    /// The largest element of the field (as a list of numbers) reaches the threshold.
    MinThreshold,
    /// String field contains a substring.
    Contains,
    /// String field does not contain a substring. A missing field still fails.
    NotContains,
    /// String field starts with a prefix.
    StartsWith,
    /// String field ends with a suffix.
    EndsWith,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Scalar field is a member of the value list.
    In,
    /// Scalar field is not a member of the value list. A missing field still fails.
    NotIn,
    /// String field matches a regular expression.
    Regex,
    /// Text score of the value against the field (or any string in it) is above zero.
    Fuzzy,
}

impl Op {
    /// Returns `true` for operators evaluated through an ordering comparison.
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Returns `true` for operators that take a string pattern.
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            Op::Contains | Op::NotContains | Op::StartsWith | Op::EndsWith | Op::Regex | Op::Fuzzy
        )
    }

    /// Evaluates an ordering-based operator.
    ///
    /// Non-ordering operators return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Equals => "equals",
            Op::NotEquals => "notEquals",
            Op::Includes => "includes",
            Op::Range => "range",
            Op::MinThreshold => "minThreshold",
            Op::Contains => "contains",
            Op::NotContains => "notContains",
            Op::StartsWith => "startsWith",
            Op::EndsWith => "endsWith",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::In => "in",
            Op::NotIn => "notIn",
            Op::Regex => "regex",
            Op::Fuzzy => "fuzzy",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when an operator name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOp(pub String);

impl std::fmt::Display for UnknownOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOp {}

impl FromStr for Op {
    type Err = UnknownOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "equals" | "eq" => Op::Equals,
            "notEquals" | "not_equals" | "ne" => Op::NotEquals,
            "includes" => Op::Includes,
            "range" | "between" => Op::Range,
            "minThreshold" | "min_threshold" => Op::MinThreshold,
            "contains" => Op::Contains,
            "notContains" | "not_contains" => Op::NotContains,
            "startsWith" | "starts_with" => Op::StartsWith,
            "endsWith" | "ends_with" => Op::EndsWith,
            "gt" => Op::Gt,
            "gte" => Op::Gte,
            "lt" => Op::Lt,
            "lte" => Op::Lte,
            "in" => Op::In,
            "notIn" | "not_in" => Op::NotIn,
            "regex" => Op::Regex,
            "fuzzy" => Op::Fuzzy,
            other => return Err(UnknownOp(other.to_string())),
        };
        Ok(op)
    }
}
