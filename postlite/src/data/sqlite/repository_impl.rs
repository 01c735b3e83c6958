//! TableRepository trait implementation for SQLite

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::filters::SqlValue;
use crate::data::query::{Conditions, QueryOptions};
use crate::data::traits::TableRepository;
use crate::data::types::{ColumnInfo, ColumnValues, Filtered, Record, Relationship};

use super::SqliteService;
use super::{catalog, tables};

#[async_trait]
impl TableRepository for SqliteService {
    async fn query(
        &self,
        table: &str,
        options: &QueryOptions,
    ) -> Result<Filtered<Vec<Record>>, DataError> {
        tables::query_table(self.pool(), table, options)
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, table: &str, data: &ColumnValues) -> Result<Option<Record>, DataError> {
        tables::insert_record(self.pool(), table, data)
            .await
            .map_err(Into::into)
    }

    async fn update(
        &self,
        table: &str,
        data: &ColumnValues,
        conditions: &Conditions,
    ) -> Result<Filtered<u64>, DataError> {
        tables::update_records(self.pool(), table, data, conditions)
            .await
            .map_err(Into::into)
    }

    async fn delete(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> Result<Filtered<Vec<Record>>, DataError> {
        tables::delete_records(self.pool(), table, conditions)
            .await
            .map_err(Into::into)
    }

    async fn list_tables(&self) -> Result<Vec<String>, DataError> {
        catalog::list_tables(self.pool()).await.map_err(Into::into)
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DataError> {
        catalog::describe_table(self.pool(), table)
            .await
            .map_err(Into::into)
    }

    async fn relationships(&self, table: Option<&str>) -> Result<Vec<Relationship>, DataError> {
        catalog::table_relationships(self.pool(), table)
            .await
            .map_err(Into::into)
    }

    async fn execute_raw(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DataError> {
        tables::execute_sql(self.pool(), sql, params)
            .await
            .map_err(Into::into)
    }
}
