//! Shared data types

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::filters::FilterWarning;

/// One result row: column name to JSON value, in column order
pub type Record = Map<String, Value>;

/// Column name to value, for inserts, updates and equality filters
pub type ColumnValues = Map<String, Value>;

/// Column metadata as reported by `describe_table`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    /// `"YES"` or `"NO"`
    pub is_nullable: String,
    pub column_default: Option<String>,
    pub is_primary_key: bool,
}

/// Foreign key edge from `table_name.column_name` to
/// `foreign_table_name.foreign_column_name`.
///
/// `foreign_column_name` is `None` when the key references the parent's
/// primary key implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub table_name: String,
    pub column_name: String,
    pub foreign_table_name: String,
    pub foreign_column_name: Option<String>,
}

/// An operation result together with any filter clauses that were skipped
/// while building it
#[derive(Debug, Clone)]
pub struct Filtered<T> {
    pub value: T,
    pub warnings: Vec<FilterWarning>,
}

impl<T> Filtered<T> {
    pub fn new(value: T, warnings: Vec<FilterWarning>) -> Self {
        Self { value, warnings }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Filtered<U> {
        Filtered {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
