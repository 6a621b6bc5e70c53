//! A1 Search - result ranking and pagination engine for betting data.
//!
//! Every search view (player lookup, prop listings, opportunity tables, the
//! command palette) runs the same pipeline over an in-memory record set:
//!
//! ```text
//! records ─▶ filter ─▶ text score ─▶ sort ─▶ paginate ─▶ page
//! ```
//!
//! - **Filter**: criteria (`equals`, `includes`, `range`, `minThreshold`, ...)
//!   combined with AND (or OR, see [`Logic`]), plus OR and NOT groups in the
//!   builder API
//! - **Text score**: case-insensitive substring or subsequence match in `[0, 1]`
//! - **Sort**: stable multi-key ordering; list keys sort by their maximum,
//!   missing keys sort last
//! - **Paginate**: fixed-size pages with navigation metadata
//!
//! A [`SearchSession`] drives the pipeline through `Idle → Searching → Ready |
//! Failed`, discarding results of superseded queries.
//!
//! # Quick Start
//!
//! ```rust
//! use a1_search::{Criterion, PageRequest, Query, Record, Searchable};
//! use serde_json::json;
//!
//! let players: Vec<Record> = serde_json::from_value(json!([
//!     {"name": "LeBron James", "team": "LAL", "props": [{"confidence": 0.82}]},
//!     {"name": "Stephen Curry", "team": "GSW", "props": [{"confidence": 0.91}]},
//!     {"name": "Jayson Tatum", "team": "BOS", "props": [{"confidence": 0.77}, {"confidence": 0.93}]}
//! ])).unwrap();
//!
//! let criteria = vec![Criterion::new("props.confidence", "minThreshold", 0.9)];
//! let query = Query::from_criteria(&criteria)
//!     .order_desc("props.confidence")
//!     .build();
//!
//! let page = query.page(&players, Record::accessor, PageRequest::first(10).unwrap());
//! assert_eq!(page.total_items, 2);
//! assert_eq!(page.items[0].get("name").as_str(), Some("Jayson Tatum"));
//! ```
//!
//! # Typed structs
//!
//! Structs join the pipeline by implementing [`Searchable`] or by passing an
//! accessor function `fn(&T, &str) -> Value`:
//!
//! ```rust
//! use a1_search::{Query, Value, Number};
//!
//! struct Opportunity {
//!     market: String,
//!     roi: f64,
//! }
//!
//! fn accessor<'a>(o: &'a Opportunity, field: &str) -> Value<'a> {
//!     match field {
//!         "market" => Value::String(&o.market),
//!         "roi" => Value::Number(Number::F64(o.roi)),
//!         _ => Value::None,
//!     }
//! }
//!
//! let opps = vec![
//!     Opportunity { market: "moneyline".into(), roi: 4.2 },
//!     Opportunity { market: "spread".into(), roi: 7.9 },
//! ];
//! let best = Query::new().and_gte("roi", 5).order_desc("roi").build();
//! assert_eq!(best.filter(&opps, accessor)[0].market, "spread");
//! ```
//!
//! # Operators
//!
//! | Operator | Matches when |
//! |----------|--------------|
//! | `equals` / `notEquals` | deep (in)equality; numbers compare across representations |
//! | `includes` | field list contains the value, or intersects a value list |
//! | `range` | scalar within `[min, max]`, inclusive |
//! | `minThreshold` | largest numeric element is at least the threshold |
//! | `contains`, `notContains`, `startsWith`, `endsWith` | case-sensitive string tests |
//! | `gt`, `gte`, `lt`, `lte` | ordered comparison of scalars |
//! | `in` / `notIn` | scalar is (not) a member of the value list |
//! | `regex` | string matches the pattern |
//! | `fuzzy` | text score of the value against a string in the field is above zero |
//!
//! A missing field never matches, for any operator. A malformed criterion is
//! logged and matches nothing.

mod clause;
mod criterion;
mod error;
mod facet;
mod op;
mod ordering;
mod page;
mod query;
mod record;
mod score;
mod session;
mod stats;
mod suggest;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseValue};
pub use criterion::{Criterion, Logic};
pub use error::{Result, SearchError};
pub use facet::{facets, Facet};
pub use op::{Op, UnknownOp};
pub use ordering::{compare_keys, sort, sort_by_orderings, sort_key, Dir, OrderBy};
pub use page::{paginate, Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use query::{filter, Query, TextSearch};
pub use record::{resolve, Record, ALL_VALUES};
pub use score::{best_score, rank, score};
pub use session::{Debounce, RecordSource, SearchSession, SessionState, Ticket};
pub use stats::{field_stats, FieldStats};
pub use suggest::suggest;
pub use traits::Searchable;
pub use value::{Number, Timestamp, Value};
