//! Repository trait for the table operations
//!
//! `SqliteService` is the only implementation; the `Database` facade holds
//! it as `Arc<dyn TableRepository>` and layers write serialization on top.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::filters::SqlValue;
use crate::data::query::{Conditions, QueryOptions};
use crate::data::types::{ColumnInfo, ColumnValues, Filtered, Record, Relationship};

#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Rows matching `options`, with any skipped filter clauses
    async fn query(
        &self,
        table: &str,
        options: &QueryOptions,
    ) -> Result<Filtered<Vec<Record>>, DataError>;

    /// Insert one row and return it re-read by rowid
    async fn insert(&self, table: &str, data: &ColumnValues) -> Result<Option<Record>, DataError>;

    /// Number of rows changed
    async fn update(
        &self,
        table: &str,
        data: &ColumnValues,
        conditions: &Conditions,
    ) -> Result<Filtered<u64>, DataError>;

    /// Rows as they were before deletion
    async fn delete(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> Result<Filtered<Vec<Record>>, DataError>;

    async fn list_tables(&self) -> Result<Vec<String>, DataError>;

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DataError>;

    async fn relationships(&self, table: Option<&str>) -> Result<Vec<Relationship>, DataError>;

    /// Execute SQL as given. Callers apply the keyword guard.
    async fn execute_raw(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DataError>;
}
