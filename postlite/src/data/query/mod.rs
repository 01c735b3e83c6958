//! Parameterized CRUD statement assembly
//!
//! Builds SELECT/INSERT/UPDATE/DELETE text plus ordered bind values from a
//! table name, an equality filter map and an optional raw filter string.
//!
//! Table and column names are substituted verbatim. Callers are trusted to
//! pass well-formed identifiers; only values are ever bound.

mod builder;
mod options;

pub use builder::{Statement, build_delete, build_insert, build_select, build_update};
pub use options::{Conditions, OrderBy, OrderDirection, QueryOptions};
