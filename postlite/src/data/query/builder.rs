//! SQL statement builder
//!
//! Placeholder order always matches clause order: SET values, then equality
//! filters, then raw filter values.

use crate::data::filters::{FilterWarning, SqlValue, parse_raw_filters};
use crate::data::types::ColumnValues;

use super::options::{Conditions, QueryOptions};

/// SQL text with its bind values and any filter clauses that were skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub warnings: Vec<FilterWarning>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            ..Default::default()
        }
    }

    /// Append ` WHERE ...` for the given conditions, if any apply
    fn push_where(&mut self, conditions: &Conditions) {
        let mut clauses = Vec::new();

        for (column, value) in conditions.filters.iter().flatten() {
            clauses.push(format!("{} = ?", column));
            self.params.push(SqlValue::from(value));
        }

        if let Some(raw) = conditions.raw_filters.as_deref() {
            let parsed = parse_raw_filters(raw);
            if !parsed.is_empty() {
                clauses.push(parsed.clause);
                self.params.extend(parsed.params);
            }
            self.warnings.extend(parsed.warnings);
        }

        if !clauses.is_empty() {
            self.sql.push_str(" WHERE ");
            self.sql.push_str(&clauses.join(" AND "));
        }
    }
}

/// `SELECT <projection> FROM <table> [WHERE ..] [ORDER BY ..] [LIMIT n] [OFFSET n]`
///
/// LIMIT and OFFSET are literals. SQLite only accepts OFFSET after a LIMIT,
/// so an offset on its own is paired with `LIMIT -1` (no limit).
pub fn build_select(table: &str, options: &QueryOptions) -> Statement {
    let mut stmt = Statement::new(format!("SELECT {} FROM {}", options.projection(), table));
    stmt.push_where(&options.conditions);

    if let Some(order) = options.order_by() {
        stmt.sql.push_str(&format!(
            " ORDER BY {} {}",
            order.column,
            order.direction.as_sql()
        ));
    }

    match (options.limit, options.offset) {
        (Some(limit), Some(offset)) => {
            stmt.sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
        }
        (Some(limit), None) => stmt.sql.push_str(&format!(" LIMIT {}", limit)),
        (None, Some(offset)) => stmt.sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
        (None, None) => {}
    }

    stmt
}

/// `INSERT INTO <table> (cols..) VALUES (?, ..)` in the map's key order.
/// An empty map inserts a row of defaults.
pub fn build_insert(table: &str, data: &ColumnValues) -> Statement {
    if data.is_empty() {
        return Statement::new(format!("INSERT INTO {} DEFAULT VALUES", table));
    }

    let columns: Vec<&str> = data.keys().map(String::as_str).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    let mut stmt = Statement::new(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    ));
    stmt.params = data.values().map(SqlValue::from).collect();
    stmt
}

/// `UPDATE <table> SET col = ?, .. [WHERE ..]`
pub fn build_update(table: &str, data: &ColumnValues, conditions: &Conditions) -> Statement {
    let assignments: Vec<String> = data.keys().map(|c| format!("{} = ?", c)).collect();

    let mut stmt = Statement::new(format!("UPDATE {} SET {}", table, assignments.join(", ")));
    stmt.params = data.values().map(SqlValue::from).collect();
    stmt.push_where(conditions);
    stmt
}

/// `DELETE FROM <table> [WHERE ..]`
pub fn build_delete(table: &str, conditions: &Conditions) -> Statement {
    let mut stmt = Statement::new(format!("DELETE FROM {}", table));
    stmt.push_where(conditions);
    stmt
}
