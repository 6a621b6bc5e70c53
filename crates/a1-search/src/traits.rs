//! The [`Searchable`] trait gives typed structs field access by name.

use crate::value::Value;

/// Types whose fields can be resolved by name for filtering and sorting.
///
/// Dynamic [`Record`](crate::Record)s implement this through dotted paths.
/// Typed structs implement it by hand:
///
/// ```
/// use a1_search::{Searchable, Value, Number};
///
/// struct Opportunity {
///     market: String,
///     edge: f64,
/// }
///
/// impl Searchable for Opportunity {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "market" => Value::String(&self.market),
///             "edge" => Value::Number(Number::F64(self.edge)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Searchable {
    /// Returns the value of a field, or [`Value::None`] if it doesn't exist.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns an accessor function suitable for [`Query::filter`](crate::Query::filter).
    ///
    /// ```ignore
    /// let results = query.filter(&players, Record::accessor);
    /// ```
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}
