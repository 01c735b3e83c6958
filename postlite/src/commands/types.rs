//! Command inputs and output

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::query::{Conditions, QueryOptions};
use crate::data::types::ColumnValues;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryInput {
    pub table: String,
    #[serde(flatten)]
    pub options: QueryOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertInput {
    pub table: String,
    #[serde(default)]
    pub data: ColumnValues,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInput {
    pub table: String,
    pub data: ColumnValues,
    #[serde(flatten)]
    pub conditions: Conditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteInput {
    pub table: String,
    #[serde(flatten)]
    pub conditions: Conditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableInput {
    pub table: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipsInput {
    #[serde(default)]
    pub table: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteSqlInput {
    pub query: String,
    #[serde(default)]
    pub params: Vec<Value>,
    /// Skip the keyword denylist
    #[serde(rename = "unsafe", default)]
    pub allow_unsafe: bool,
}

/// JSON envelope written for every executed command
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub command: &'static str,
    pub result: Value,
    /// Filter clauses that were skipped
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
