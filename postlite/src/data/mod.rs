//! Data layer
//!
//! - `filters` - `column.operator.value` filter language
//! - `query` - parameterized SELECT/INSERT/UPDATE/DELETE assembly
//! - `sqlite` - connection service, CRUD execution and introspection
//! - `traits` - repository trait the `Database` facade is built on
//! - `write_gate` - exclusive write section with cancellation
//! - `weak_guard` - keyword denylist for raw SQL
//! - `types` - records, column metadata and relationships
//! - `error` - unified error type

pub mod error;
pub mod filters;
pub mod query;
pub mod sqlite;
pub mod traits;
pub mod types;
pub mod weak_guard;
pub mod write_gate;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::TableRepository;
pub use write_gate::WriteGate;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::data::filters::SqlValue;
use crate::data::query::{Conditions, QueryOptions};
use crate::data::types::{ColumnInfo, ColumnValues, Filtered, Record, Relationship};

/// Table operations over a repository, with writes serialized through a
/// [`WriteGate`].
///
/// Reads go straight to the repository. Insert, update, delete and raw SQL
/// run with `allow_unsafe` wait for the gate and fail with
/// `DataError::Cancelled` if `cancel` fires first.
#[derive(Clone)]
pub struct Database {
    repository: Arc<dyn TableRepository>,
    gate: Arc<WriteGate>,
}

impl Database {
    pub fn new(repository: Arc<dyn TableRepository>) -> Self {
        Self {
            repository,
            gate: Arc::new(WriteGate::new()),
        }
    }

    pub async fn query(
        &self,
        table: &str,
        options: &QueryOptions,
    ) -> Result<Filtered<Vec<Record>>, DataError> {
        self.repository.query(table, options).await
    }

    pub async fn insert(
        &self,
        table: &str,
        data: &ColumnValues,
        cancel: &CancellationToken,
    ) -> Result<Option<Record>, DataError> {
        self.gate
            .run(cancel, self.repository.insert(table, data))
            .await
    }

    pub async fn update(
        &self,
        table: &str,
        data: &ColumnValues,
        conditions: &Conditions,
        cancel: &CancellationToken,
    ) -> Result<Filtered<u64>, DataError> {
        self.gate
            .run(cancel, self.repository.update(table, data, conditions))
            .await
    }

    pub async fn delete(
        &self,
        table: &str,
        conditions: &Conditions,
        cancel: &CancellationToken,
    ) -> Result<Filtered<Vec<Record>>, DataError> {
        self.gate
            .run(cancel, self.repository.delete(table, conditions))
            .await
    }

    pub async fn list_tables(&self) -> Result<Vec<String>, DataError> {
        self.repository.list_tables().await
    }

    pub async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DataError> {
        self.repository.describe_table(table).await
    }

    pub async fn relationships(&self, table: Option<&str>) -> Result<Vec<Relationship>, DataError> {
        self.repository.relationships(table).await
    }

    /// Execute arbitrary SQL.
    ///
    /// Without `allow_unsafe` the text is checked against the keyword
    /// denylist and runs outside the write gate. With it, the check is
    /// skipped and the statement runs inside the gate.
    pub async fn execute_raw(
        &self,
        sql: &str,
        params: &[SqlValue],
        allow_unsafe: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, DataError> {
        if !allow_unsafe {
            weak_guard::ensure_non_destructive(sql)?;
            return self.repository.execute_raw(sql, params).await;
        }

        tracing::debug!("Executing unchecked raw SQL");
        self.gate
            .run(cancel, self.repository.execute_raw(sql, params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn setup_database() -> Database {
        let service = SqliteService::in_memory().await.unwrap();
        service
            .apply_schema(
                "CREATE TABLE items (
                    id INTEGER PRIMARY KEY,
                    x INTEGER,
                    y TEXT
                );",
            )
            .await
            .unwrap();
        Database::new(Arc::new(service))
    }

    fn data(value: serde_json::Value) -> ColumnValues {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_query_round_trip() {
        let db = setup_database().await;
        let cancel = CancellationToken::new();

        let inserted = db
            .insert("items", &data(json!({"x": 1, "y": "a"})), &cancel)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(inserted["y"], json!("a"));

        let rows = db
            .query("items", &QueryOptions::matching(Conditions::equals("x", 1)))
            .await
            .unwrap()
            .value;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["y"], json!("a"));
    }

    #[tokio::test]
    async fn test_update_matching_nothing() {
        let db = setup_database().await;
        let cancel = CancellationToken::new();

        let updated = db
            .update(
                "items",
                &data(json!({"y": "b"})),
                &Conditions::raw("x.gt.100"),
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(updated.value, 0);
    }

    #[tokio::test]
    async fn test_delete_returns_pre_delete_rows() {
        let db = setup_database().await;
        let cancel = CancellationToken::new();
        db.insert("items", &data(json!({"x": 1, "y": "a"})), &cancel)
            .await
            .unwrap();
        db.insert("items", &data(json!({"x": 2, "y": "b"})), &cancel)
            .await
            .unwrap();

        let conditions = Conditions::equals("x", 2);
        let deleted = db.delete("items", &conditions, &cancel).await.unwrap();
        assert_eq!(
            deleted.value,
            vec![data(json!({"id": 2, "x": 2, "y": "b"}))]
        );

        let after = db
            .query("items", &QueryOptions::matching(conditions))
            .await
            .unwrap()
            .value;
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn test_execute_raw_guard() {
        let db = setup_database().await;
        let cancel = CancellationToken::new();

        let rows = db.execute_raw("SELECT 1", &[], false, &cancel).await.unwrap();
        assert_eq!(rows, vec![data(json!({"1": 1}))]);

        let err = db
            .execute_raw("DROP TABLE x", &[], false, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "UnsafeOperationError");

        // Reaches SQLite, which reports the missing table
        let err = db
            .execute_raw("DROP TABLE x", &[], true, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "BackendError");

        db.execute_raw("DROP TABLE items", &[], true, &cancel)
            .await
            .unwrap();
        assert!(db.list_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_write_does_nothing() {
        let db = setup_database().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = db
            .insert("items", &data(json!({"x": 1})), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CancelledError");

        // Reads ignore the token
        let rows = db.query("items", &QueryOptions::default()).await.unwrap();
        assert!(rows.value.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_mutations_leave_rows_untouched() {
        let db = setup_database().await;
        let live = CancellationToken::new();
        db.insert("items", &data(json!({"x": 1, "y": "keep"})), &live)
            .await
            .unwrap();

        let cancelled = CancellationToken::new();
        cancelled.cancel();

        let err = db
            .update(
                "items",
                &data(json!({"y": "changed"})),
                &Conditions::equals("x", 1),
                &cancelled,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CancelledError");

        let err = db
            .delete("items", &Conditions::equals("x", 1), &cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CancelledError");

        let err = db
            .execute_raw("DELETE FROM items", &[], true, &cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CancelledError");

        let rows = db.query("items", &QueryOptions::default()).await.unwrap();
        assert_eq!(rows.value.len(), 1);
        assert_eq!(rows.value[0]["x"], json!(1));
        assert_eq!(rows.value[0]["y"], json!("keep"));
    }

    #[tokio::test]
    async fn test_catalog_passthrough() {
        let db = setup_database().await;
        assert_eq!(db.list_tables().await.unwrap(), vec!["items"]);

        let first = db.describe_table("items").await.unwrap();
        let second = db.describe_table("items").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(db.relationships(None).await.unwrap().is_empty());
    }
}
