//! Query builder and executor.
//!
//! A [`Query`] bundles the whole pipeline: predicate clauses, an optional
//! text search, sort specifications, and execution against a slice with
//! [`Query::filter`] or [`Query::page`].

use std::borrow::Cow;

use regex::Regex;

use crate::clause::{Clause, ClauseValue};
use crate::criterion::{Criterion, Logic};
use crate::error::Result;
use crate::op::Op;
use crate::ordering::{sort_by_orderings, Dir, OrderBy};
use crate::page::{paginate, Page, PageRequest};
use crate::record::ALL_VALUES;
use crate::score::score;
use crate::value::Value;

/// Free-text search over a set of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearch {
    /// The query text.
    pub text: String,
    /// Field paths whose string and numeric values are scored against the
    /// text. Empty means every value, through the [`ALL_VALUES`] path.
    pub fields: Vec<String>,
}

/// A query for filtering, ranking and ordering collections.
///
/// Clauses combine in three groups:
///
/// ```text
/// match = (all AND clauses match)
///       ∧ (at least one OR clause matches, OR no OR clauses exist)
///       ∧ (no NOT clause matches)
///       ∧ (text search scores above zero, when one is set)
/// ```
///
/// Results are ordered by the sort specifications. Without any, a text search
/// ranks results by best score; ties and unsorted results keep input order.
///
/// # Example
///
/// ```
/// use a1_search::{Query, Record, Searchable, PageRequest};
/// use serde_json::json;
///
/// let players: Vec<Record> = serde_json::from_value(json!([
///     {"name": "LeBron James", "team": "LAL", "hotness": 94},
///     {"name": "Stephen Curry", "team": "GSW", "hotness": 88},
///     {"name": "Jayson Tatum", "team": "BOS", "hotness": 91}
/// ])).unwrap();
///
/// let query = Query::new()
///     .and_includes("team", vec!["BOS", "GSW"])
///     .order_desc("hotness")
///     .build();
///
/// let page = query.page(&players, Record::accessor, PageRequest::new(1, 2).unwrap());
/// assert_eq!(page.items[0].get("name").as_str(), Some("Stephen Curry"));
/// assert_eq!(page.total_pages, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    not_clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    text: Option<TextSearch>,
}

impl Query {
    /// Creates a new empty query. An empty query matches all items.
    pub fn new() -> Self {
        Query::default()
    }

    /// Builds a query whose AND group holds the given criteria.
    ///
    /// Malformed criteria become clauses that never match.
    pub fn from_criteria<'c, I>(criteria: I) -> Self
    where
        I: IntoIterator<Item = &'c Criterion>,
    {
        Query::from_criteria_with(criteria, Logic::And)
    }

    /// Builds a query whose OR group holds the given criteria.
    pub fn from_criteria_any<'c, I>(criteria: I) -> Self
    where
        I: IntoIterator<Item = &'c Criterion>,
    {
        Query::from_criteria_with(criteria, Logic::Or)
    }

    /// Builds a query from criteria combined with `logic`.
    pub fn from_criteria_with<'c, I>(criteria: I, logic: Logic) -> Self
    where
        I: IntoIterator<Item = &'c Criterion>,
    {
        criteria
            .into_iter()
            .fold(Query::new(), |query, criterion| match logic {
                Logic::And => query.and_clause(criterion.to_clause()),
                Logic::Or => query.or_clause(criterion.to_clause()),
            })
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds an AND clause.
    pub fn and(self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clause(Clause::new(field, op, value))
    }

    /// Adds a prebuilt AND clause.
    pub fn and_clause(mut self, clause: Clause) -> Self {
        self.and_clauses.push(clause);
        self
    }

    /// Adds an OR clause.
    pub fn or(self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.or_clause(Clause::new(field, op, value))
    }

    /// Adds a prebuilt OR clause.
    pub fn or_clause(mut self, clause: Clause) -> Self {
        self.or_clauses.push(clause);
        self
    }

    /// Adds a NOT clause.
    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds an AND equality clause.
    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Equals, value)
    }

    /// Adds an AND not-equal clause.
    pub fn and_ne(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::NotEquals, value)
    }

    /// Adds an AND includes clause (list membership or intersection).
    pub fn and_includes(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Includes, value)
    }

    /// Adds an AND inclusive range clause.
    pub fn and_range(
        self,
        field: &str,
        min: impl Into<ClauseValue>,
        max: impl Into<ClauseValue>,
    ) -> Self {
        self.and(field, Op::Range, ClauseValue::range(min, max))
    }

    /// Adds an AND clause requiring the field's largest number to reach `threshold`.
    pub fn and_min_threshold(self, field: &str, threshold: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::MinThreshold, threshold)
    }

    /// Adds an AND greater-than clause.
    pub fn and_gt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gt, value)
    }

    /// Adds an AND greater-than-or-equal clause.
    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    /// Adds an AND less-than clause.
    pub fn and_lt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lt, value)
    }

    /// Adds an AND less-than-or-equal clause.
    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    /// Adds an AND substring clause.
    pub fn and_contains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::Contains, value)
    }

    /// Adds an AND set-membership clause.
    pub fn and_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ClauseValue>,
    {
        let set: Vec<ClauseValue> = values.into_iter().map(Into::into).collect();
        self.and(field, Op::In, ClauseValue::List(set))
    }

    /// Adds an AND regex clause.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn and_regex(self, field: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(self.and(field, Op::Regex, regex))
    }

    /// Adds an OR equality clause.
    pub fn or_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.or(field, Op::Equals, value)
    }

    /// Adds an OR substring clause.
    pub fn or_contains(self, field: &str, value: &str) -> Self {
        self.or(field, Op::Contains, value)
    }

    /// Adds a NOT equality clause.
    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Equals, value)
    }

    /// Adds a NOT includes clause.
    pub fn not_includes(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Includes, value)
    }

    // ========================================================================
    // Text search and ordering
    // ========================================================================

    /// Sets a free-text search scored against the given fields.
    ///
    /// An empty text matches everything. With no fields, every value in the
    /// item is scored (see [`ALL_VALUES`]).
    pub fn search<I, S>(mut self, text: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text = Some(TextSearch {
            text: text.to_string(),
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds an ordering clause.
    pub fn order_by(self, field: &str, dir: Dir) -> Self {
        self.order(OrderBy::new(field, dir))
    }

    /// Adds a prebuilt ordering clause.
    pub fn order(mut self, order: OrderBy) -> Self {
        self.orderings.push(order);
        self
    }

    /// Adds an ascending ordering clause.
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Adds a descending ordering clause.
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the AND clauses.
    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    /// Returns the OR clauses.
    pub fn or_clauses(&self) -> &[Clause] {
        &self.or_clauses
    }

    /// Returns the NOT clauses.
    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    /// Returns the ordering clauses.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns the text search, if any.
    pub fn text_search(&self) -> Option<&TextSearch> {
        self.text.as_ref()
    }

    /// Returns `true` if the query has no clauses and no text search.
    pub fn is_empty(&self) -> bool {
        self.and_clauses.is_empty()
            && self.or_clauses.is_empty()
            && self.not_clauses.is_empty()
            && self.text.is_none()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item matches this query.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.passes_clauses(item, &accessor) && self.text_score(item, &accessor) > 0.0
    }

    /// Best text-search score of an item; `1.0` when there is no text search.
    pub fn text_score<T, F>(&self, item: &T, accessor: F) -> f64
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let Some(search) = &self.text else {
            return 1.0;
        };
        if search.text.is_empty() {
            return 1.0;
        }
        let field_score = |field: &str| {
            accessor(item, field)
                .elements()
                .iter()
                .filter_map(searchable_text)
                .map(|text| score(&search.text, &text))
                .fold(0.0, f64::max)
        };
        if search.fields.is_empty() {
            return field_score(ALL_VALUES);
        }
        search
            .fields
            .iter()
            .map(|field| field_score(field))
            .fold(0.0, f64::max)
    }

    /// Filters a slice, returning references to matching items in result order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let ranking = self.ranks_by_score();
        let mut scored: Vec<(&'a T, f64)> = items
            .iter()
            .filter_map(|item| {
                if !self.passes_clauses(item, &accessor) {
                    return None;
                }
                let score = self.text_score(item, &accessor);
                (score > 0.0).then_some((item, score))
            })
            .collect();

        if ranking {
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        }

        let results: Vec<&'a T> = scored.into_iter().map(|(item, _)| item).collect();
        sort_by_orderings(results, &self.orderings, &accessor)
    }

    /// Runs the query and returns one page of results.
    pub fn page<'a, T, F>(&self, items: &'a [T], accessor: F, request: PageRequest) -> Page<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        paginate(self.filter(items, accessor), request)
    }

    /// Filters and clones matching items.
    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F) -> Vec<T>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.filter(items, accessor).into_iter().cloned().collect()
    }

    /// Counts the number of matching items.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    /// Returns `true` if any item matches.
    pub fn any<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().any(|item| self.matches(item, &accessor))
    }

    /// Returns `true` if all items match.
    pub fn all<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().all(|item| self.matches(item, &accessor))
    }

    /// Finds the first matching item in input order.
    pub fn find<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items.iter().find(|item| self.matches(*item, &accessor))
    }

    fn passes_clauses<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let hits = |clause: &Clause| clause.matches(&accessor(item, &clause.field));

        // short-circuits on the first failing clause
        self.and_clauses.iter().all(hits)
            && (self.or_clauses.is_empty() || self.or_clauses.iter().any(hits))
            && !self.not_clauses.iter().any(hits)
    }

    fn ranks_by_score(&self) -> bool {
        self.orderings.is_empty()
            && self
                .text
                .as_ref()
                .is_some_and(|search| !search.text.is_empty())
    }
}

/// Text form of a value for scoring; numbers are rendered in decimal.
fn searchable_text<'a>(value: &Value<'a>) -> Option<Cow<'a, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(*s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Keeps the items satisfying every criterion, in input order.
///
/// ```
/// use a1_search::{filter, Criterion, Record, Searchable};
/// use serde_json::json;
///
/// let props: Vec<Record> = serde_json::from_value(json!([
///     {"player": "A", "props": [{"confidence": 0.91}]},
///     {"player": "B", "props": [{"confidence": 0.62}]}
/// ])).unwrap();
///
/// let hot = filter(&props, &[Criterion::new("props.confidence", "minThreshold", 0.9)], Record::accessor);
/// assert_eq!(hot.len(), 1);
/// ```
pub fn filter<'a, T, F>(items: &'a [T], criteria: &[Criterion], accessor: F) -> Vec<&'a T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    Query::from_criteria(criteria).filter(items, accessor)
}
