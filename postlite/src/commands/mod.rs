//! Table commands
//!
//! Each command is a single-key JSON object naming the operation, e.g.
//! `{"query_db": {"table": "tasks", "raw_filters": "status.eq.open"}}`.
//! Commands are read from the CLI or from a batch on stdin and executed
//! against a [`Database`].

mod types;

pub use types::{
    CommandOutput, DeleteInput, ExecuteSqlInput, InsertInput, QueryInput, RelationshipsInput,
    TableInput, UpdateInput,
};

use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::data::filters::{FilterWarning, SqlValue};
use crate::data::types::Filtered;
use crate::data::{DataError, Database};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    QueryDb(QueryInput),
    InsertDb(InsertInput),
    UpdateDb(UpdateInput),
    DeleteDb(DeleteInput),
    ListDbTables {},
    DescribeDbTable(TableInput),
    GetDbRelationships(RelationshipsInput),
    ExecuteSql(ExecuteSqlInput),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::QueryDb(_) => "query_db",
            Self::InsertDb(_) => "insert_db",
            Self::UpdateDb(_) => "update_db",
            Self::DeleteDb(_) => "delete_db",
            Self::ListDbTables {} => "list_db_tables",
            Self::DescribeDbTable(_) => "describe_db_table",
            Self::GetDbRelationships(_) => "get_db_relationships",
            Self::ExecuteSql(_) => "execute_sql",
        }
    }

    pub async fn execute(
        &self,
        db: &Database,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, DataError> {
        tracing::debug!(command = self.name(), "Executing command");

        let result = match self {
            Self::QueryDb(input) => db
                .query(&input.table, &input.options)
                .await?
                .map(|rows| json!(rows)),
            Self::InsertDb(input) => {
                let row = db.insert(&input.table, &input.data, cancel).await?;
                Filtered::new(Value::Object(row.unwrap_or_default()), Vec::new())
            }
            Self::UpdateDb(input) => db
                .update(&input.table, &input.data, &input.conditions, cancel)
                .await?
                .map(|count| json!(count)),
            Self::DeleteDb(input) => db
                .delete(&input.table, &input.conditions, cancel)
                .await?
                .map(|rows| json!(rows)),
            Self::ListDbTables {} => Filtered::new(json!(db.list_tables().await?), Vec::new()),
            Self::DescribeDbTable(input) => {
                let columns = db.describe_table(&input.table).await?;
                let relationships = db.relationships(Some(&input.table)).await?;
                Filtered::new(
                    json!({"columns": columns, "relationships": relationships}),
                    Vec::new(),
                )
            }
            Self::GetDbRelationships(input) => Filtered::new(
                json!(db.relationships(input.table.as_deref()).await?),
                Vec::new(),
            ),
            Self::ExecuteSql(input) => {
                let params: Vec<SqlValue> = input.params.iter().map(SqlValue::from).collect();
                let rows = db
                    .execute_raw(&input.query, &params, input.allow_unsafe, cancel)
                    .await?;
                Filtered::new(json!(rows), Vec::new())
            }
        };

        Ok(self.output(result))
    }

    fn output(&self, result: Filtered<Value>) -> CommandOutput {
        CommandOutput {
            command: self.name(),
            result: result.value,
            warnings: result.warnings.iter().map(FilterWarning::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::SqliteService;

    async fn setup_database() -> Database {
        let service = SqliteService::in_memory().await.unwrap();
        service
            .apply_schema(
                "CREATE TABLE projects (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
                 CREATE TABLE tasks (
                     id INTEGER PRIMARY KEY,
                     project_id INTEGER REFERENCES projects(id),
                     title TEXT,
                     status TEXT DEFAULT 'pending'
                 );",
            )
            .await
            .unwrap();
        Database::new(Arc::new(service))
    }

    async fn run(db: &Database, command: Value) -> Result<CommandOutput, DataError> {
        let command: Command = serde_json::from_value(command).unwrap();
        command.execute(db, &CancellationToken::new()).await
    }

    #[test]
    fn test_parse_query_command() {
        let command: Command = serde_json::from_value(json!({
            "query_db": {
                "table": "tasks",
                "select": "id, title",
                "filters": {"project_id": 1},
                "raw_filters": "status.neq.done",
                "order": "id.desc",
                "limit": 5,
                "offset": 10
            }
        }))
        .unwrap();

        let Command::QueryDb(input) = command else {
            panic!("expected query_db");
        };
        assert_eq!(input.table, "tasks");
        assert_eq!(input.options.projection(), "id, title");
        assert_eq!(input.options.limit, Some(5));
        assert_eq!(input.options.offset, Some(10));
        assert_eq!(
            input.options.conditions.raw_filters.as_deref(),
            Some("status.neq.done")
        );
        assert!(input.options.conditions.filters.is_some());
    }

    #[test]
    fn test_parse_unit_and_unsafe_commands() {
        let command: Command = serde_json::from_value(json!({"list_db_tables": {}})).unwrap();
        assert_eq!(command.name(), "list_db_tables");

        let command: Command = serde_json::from_value(json!({
            "execute_sql": {"query": "DROP TABLE t", "unsafe": true}
        }))
        .unwrap();
        let Command::ExecuteSql(input) = command else {
            panic!("expected execute_sql");
        };
        assert!(input.allow_unsafe);
        assert!(input.params.is_empty());
    }

    #[test]
    fn test_parse_unknown_command_fails() {
        let result = serde_json::from_value::<Command>(json!({"drop_db": {}}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_insert_query_update_delete() {
        let db = setup_database().await;

        let out = run(&db, json!({"insert_db": {"table": "projects", "data": {"name": "p"}}}))
            .await
            .unwrap();
        assert_eq!(out.command, "insert_db");
        assert_eq!(out.result, json!({"id": 1, "name": "p"}));

        run(
            &db,
            json!({"insert_db": {"table": "tasks", "data": {"project_id": 1, "title": "t1"}}}),
        )
        .await
        .unwrap();

        let out = run(
            &db,
            json!({"update_db": {"table": "tasks", "data": {"status": "done"}, "filters": {"id": 1}}}),
        )
        .await
        .unwrap();
        assert_eq!(out.result, json!(1));

        let out = run(
            &db,
            json!({"query_db": {"table": "tasks", "raw_filters": "status.eq.done"}}),
        )
        .await
        .unwrap();
        assert_eq!(out.result[0]["title"], json!("t1"));

        let out = run(&db, json!({"delete_db": {"table": "tasks", "filters": {"id": 1}}}))
            .await
            .unwrap();
        assert_eq!(out.result[0]["status"], json!("done"));
    }

    #[tokio::test]
    async fn test_warnings_reported() {
        let db = setup_database().await;
        let out = run(
            &db,
            json!({"query_db": {"table": "tasks", "raw_filters": "id.gt.0,oops"}}),
        )
        .await
        .unwrap();

        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("oops"));

        let serialized = serde_json::to_value(&out).unwrap();
        assert_eq!(serialized["command"], json!("query_db"));
        assert!(serialized.get("warnings").is_some());
    }

    #[tokio::test]
    async fn test_describe_includes_relationships() {
        let db = setup_database().await;
        let out = run(&db, json!({"describe_db_table": {"table": "tasks"}}))
            .await
            .unwrap();

        assert_eq!(out.result["columns"].as_array().unwrap().len(), 4);
        assert_eq!(
            out.result["relationships"][0]["foreign_table_name"],
            json!("projects")
        );
    }

    #[tokio::test]
    async fn test_execute_sql_with_params() {
        let db = setup_database().await;
        let out = run(
            &db,
            json!({"execute_sql": {"query": "SELECT ? + 1 AS n", "params": [41]}}),
        )
        .await
        .unwrap();
        assert_eq!(out.result, json!([{"n": 42}]));

        let err = run(&db, json!({"execute_sql": {"query": "delete from tasks"}}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "UnsafeOperationError");
    }

    #[tokio::test]
    async fn test_list_tables_and_relationships() {
        let db = setup_database().await;
        let out = run(&db, json!({"list_db_tables": {}})).await.unwrap();
        assert_eq!(out.result, json!(["projects", "tasks"]));

        let out = run(&db, json!({"get_db_relationships": {}})).await.unwrap();
        assert_eq!(out.result.as_array().unwrap().len(), 1);
    }
}
