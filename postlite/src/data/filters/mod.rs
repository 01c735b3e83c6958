//! Raw filter expressions
//!
//! Translates PostgREST-style `column.operator.value` expressions into
//! parameterized SQL conditions. Several expressions may be joined with
//! commas; they are combined with `AND`.
//!
//! ## Usage
//!
//! ```
//! use postlite::data::filters::{parse_raw_filters, SqlValue};
//!
//! let parsed = parse_raw_filters("status.eq.active,age.gt.25");
//! assert_eq!(parsed.clause, "status = ? AND age > ?");
//! assert_eq!(parsed.params, vec![SqlValue::from("active"), SqlValue::Integer(25)]);
//! ```
//!
//! ## Known limitations
//!
//! Expressions are separated by plain commas and `in` lists are separated
//! by commas too, so neither a value containing a comma nor an `in` list can
//! be expressed inside a multi-expression string. There is no escaping.

mod error;
mod operators;
mod parser;
mod types;

pub use error::FilterError;
pub use operators::FilterOperator;
pub use parser::{parse_filter, parse_raw_filters};
pub use types::{Condition, FilterWarning, ParsedFilters, SqlValue};
