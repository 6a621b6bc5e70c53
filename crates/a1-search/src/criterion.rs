//! Wire form of filter criteria.
//!
//! UI panels and the CLI describe filters as plain data:
//!
//! ```json
//! {"field": "team", "operator": "includes", "value": ["BOS", "GSW"]}
//! ```
//!
//! Converting a [`Criterion`] into a [`Clause`] never fails. A criterion with
//! an unknown operator, an empty field path or a value of the wrong shape
//! becomes a malformed clause that matches nothing, so one bad filter cannot
//! take down a whole search.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::warn;

use crate::clause::{Clause, ClauseValue};
use crate::op::Op;

/// How a list of criteria combines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    /// Every criterion must match.
    #[default]
    #[serde(alias = "AND")]
    And,
    /// At least one criterion must match.
    #[serde(alias = "OR")]
    Or,
}

/// A filter criterion as supplied by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    /// Dotted field path.
    #[serde(default)]
    pub field: String,
    /// Operator name (`equals`, `includes`, `range`, `minThreshold`, ...).
    #[serde(alias = "op")]
    pub operator: String,
    /// Comparison value.
    #[serde(default)]
    pub value: Json,
}

impl Criterion {
    /// Creates a criterion.
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Json>) -> Self {
        Criterion {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Converts this criterion into an executable clause.
    pub fn to_clause(&self) -> Clause {
        // Unknown operators still need an Op slot; the clause is inert anyway.
        let op = match self.operator.parse::<Op>() {
            Ok(op) => op,
            Err(err) => return self.reject(Op::Equals, err.to_string()),
        };
        if self.field.trim().is_empty() {
            return self.reject(op, "missing field path");
        }
        match clause_value_for(op, &self.value) {
            Ok(value) => Clause {
                field: self.field.clone(),
                op,
                value,
            },
            Err(reason) => self.reject(op, reason),
        }
    }

    fn reject(&self, op: Op, reason: impl Into<String>) -> Clause {
        let reason = reason.into();
        warn!(
            field = %self.field,
            operator = %self.operator,
            %reason,
            "ignoring malformed filter criterion"
        );
        Clause::malformed(self.field.clone(), op, reason)
    }
}

fn clause_value_for(op: Op, json: &Json) -> Result<ClauseValue, String> {
    match op {
        Op::Range => range_value(json),
        Op::Regex => match json {
            Json::String(pattern) => Regex::new(pattern)
                .map(ClauseValue::Regex)
                .map_err(|e| format!("invalid regex: {e}")),
            _ => Err("regex expects a string pattern".into()),
        },
        Op::MinThreshold => match ClauseValue::from_json(json) {
            Some(value @ ClauseValue::Number(_)) => Ok(value),
            _ => Err("minThreshold expects a number".into()),
        },
        Op::In | Op::NotIn => match ClauseValue::from_json(json) {
            Some(value @ ClauseValue::List(_)) => Ok(value),
            _ => Err(format!("{op} expects a list")),
        },
        op if op.is_string_op() => match json {
            Json::String(s) => Ok(ClauseValue::String(s.clone())),
            _ => Err(format!("{op} expects a string")),
        },
        op if op.is_ordering_op() => match ClauseValue::from_json(json) {
            Some(ClauseValue::List(_)) | None => Err(format!("{op} expects a scalar")),
            Some(value) => Ok(value),
        },
        _ => ClauseValue::from_json(json).ok_or_else(|| format!("{op} expects a value")),
    }
}

fn range_value(json: &Json) -> Result<ClauseValue, String> {
    let (min, max) = match json {
        Json::Object(bounds) => (bounds.get("min"), bounds.get("max")),
        Json::Array(pair) if pair.len() == 2 => (pair.first(), pair.get(1)),
        _ => return Err("range expects {min, max} or [min, max]".into()),
    };
    let bound = |json: Option<&Json>| -> Result<Option<Box<ClauseValue>>, String> {
        match json {
            None | Some(Json::Null) => Ok(None),
            Some(json) => match ClauseValue::from_json(json) {
                Some(ClauseValue::List(_)) | None => Err("range bounds must be scalars".into()),
                Some(value) => Ok(Some(Box::new(value))),
            },
        }
    };
    let (min, max) = (bound(min)?, bound(max)?);
    if min.is_none() && max.is_none() {
        return Err("range needs at least one bound".into());
    }
    Ok(ClauseValue::Range { min, max })
}
