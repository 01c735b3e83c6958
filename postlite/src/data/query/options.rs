//! Query request types

use serde::Deserialize;

use crate::data::types::ColumnValues;

/// Row selection shared by query, update and delete.
///
/// Equality filters become `column = ?` clauses; `raw_filters` is a
/// comma-joined `column.operator.value` string. Everything is AND-ed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub filters: Option<ColumnValues>,
    #[serde(default)]
    pub raw_filters: Option<String>,
}

impl Conditions {
    pub fn new(filters: Option<ColumnValues>, raw_filters: Option<String>) -> Self {
        Self {
            filters,
            raw_filters,
        }
    }

    /// Single equality filter (`column = value`)
    pub fn equals(column: &str, value: impl Into<serde_json::Value>) -> Self {
        let mut filters = ColumnValues::new();
        filters.insert(column.to_string(), value.into());
        Self::new(Some(filters), None)
    }

    /// Raw filter string only
    pub fn raw(raw_filters: impl Into<String>) -> Self {
        Self::new(None, Some(raw_filters.into()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Parse `column`, `column.asc` or `column.desc`.
    ///
    /// Only a `desc` suffix (any case) sorts descending; any other suffix
    /// sorts ascending.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((column, direction)) => Self {
                column: column.to_string(),
                direction: if direction.eq_ignore_ascii_case("desc") {
                    OrderDirection::Desc
                } else {
                    OrderDirection::Asc
                },
            },
            None => Self {
                column: raw.to_string(),
                direction: OrderDirection::Asc,
            },
        }
    }
}

/// Options for a table query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryOptions {
    /// Column projection, verbatim (default `*`)
    #[serde(default)]
    pub select: Option<String>,
    #[serde(flatten)]
    pub conditions: Conditions,
    /// `column`, `column.asc` or `column.desc`
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl QueryOptions {
    /// All columns of the rows matching `conditions`
    pub fn matching(conditions: Conditions) -> Self {
        Self {
            conditions,
            ..Default::default()
        }
    }

    pub fn projection(&self) -> &str {
        match self.select.as_deref().map(str::trim) {
            Some(select) if !select.is_empty() => select,
            _ => "*",
        }
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.order
            .as_deref()
            .filter(|o| !o.is_empty())
            .map(OrderBy::parse)
    }
}
