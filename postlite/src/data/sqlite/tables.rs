//! Table CRUD and raw SQL execution
//!
//! Every mutation runs in one transaction together with the reads it
//! depends on (insert re-fetch, update/delete pre-check). Dropping the
//! transaction on an error rolls it back.
//!
//! These transactions start with `BEGIN IMMEDIATE`. A deferred `BEGIN`
//! would read under a snapshot and then fail with `SQLITE_BUSY_SNAPSHOT`
//! when upgrading to a write if another connection committed in between;
//! taking the write lock first makes concurrent writers wait on
//! `busy_timeout` instead.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data::filters::SqlValue;
use crate::data::query::{
    Conditions, QueryOptions, build_delete, build_insert, build_select, build_update,
};
use crate::data::sqlite::SqliteError;
use crate::data::types::{ColumnValues, Filtered, Record};

use super::rows::{execute, fetch_records};

/// Identity column used to re-fetch an inserted row
const ROWID_COLUMN: &str = "rowid";

const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Start a transaction holding the database write lock
async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with(BEGIN_IMMEDIATE).await
}

/// Select rows from a table
pub async fn query_table(
    pool: &SqlitePool,
    table: &str,
    options: &QueryOptions,
) -> Result<Filtered<Vec<Record>>, SqliteError> {
    let stmt = build_select(table, options);
    tracing::debug!(%table, sql = %stmt.sql, params = stmt.params.len(), "Querying table");

    let rows = fetch_records(pool, &stmt.sql, &stmt.params).await?;
    Ok(Filtered::new(rows, stmt.warnings))
}

/// Insert one row and return it as stored.
///
/// Returns `None` when SQLite reports no rowid for the insert.
pub async fn insert_record(
    pool: &SqlitePool,
    table: &str,
    data: &ColumnValues,
) -> Result<Option<Record>, SqliteError> {
    let stmt = build_insert(table, data);
    tracing::debug!(%table, sql = %stmt.sql, "Inserting record");

    let mut tx = begin_write(pool).await?;
    let rowid = execute(&mut *tx, &stmt.sql, &stmt.params)
        .await?
        .last_insert_rowid();

    if rowid == 0 {
        tx.commit().await?;
        return Ok(None);
    }

    let lookup = build_select(
        table,
        &QueryOptions::matching(Conditions::equals(ROWID_COLUMN, rowid)),
    );
    let inserted = fetch_records(&mut *tx, &lookup.sql, &lookup.params)
        .await?
        .into_iter()
        .next();
    tx.commit().await?;

    Ok(inserted)
}

/// Update matching rows and return the number changed.
///
/// Nothing is written when no row matches.
pub async fn update_records(
    pool: &SqlitePool,
    table: &str,
    data: &ColumnValues,
    conditions: &Conditions,
) -> Result<Filtered<u64>, SqliteError> {
    let check = build_select(table, &QueryOptions::matching(conditions.clone()));
    let stmt = build_update(table, data, conditions);
    warn_if_unfiltered(table, "update", &stmt.sql, &check.sql);
    tracing::debug!(%table, sql = %stmt.sql, "Updating records");

    let mut tx = begin_write(pool).await?;
    let matched = fetch_records(&mut *tx, &check.sql, &check.params).await?;
    if matched.is_empty() {
        tracing::debug!(%table, "No rows matched, skipping update");
        return Ok(Filtered::new(0, stmt.warnings));
    }

    let affected = execute(&mut *tx, &stmt.sql, &stmt.params)
        .await?
        .rows_affected();
    tx.commit().await?;

    Ok(Filtered::new(affected, stmt.warnings))
}

/// Delete matching rows and return them as they were before deletion
pub async fn delete_records(
    pool: &SqlitePool,
    table: &str,
    conditions: &Conditions,
) -> Result<Filtered<Vec<Record>>, SqliteError> {
    let check = build_select(table, &QueryOptions::matching(conditions.clone()));
    let stmt = build_delete(table, conditions);
    warn_if_unfiltered(table, "delete", &stmt.sql, &check.sql);
    tracing::debug!(%table, sql = %stmt.sql, "Deleting records");

    let mut tx = begin_write(pool).await?;
    let deleted = fetch_records(&mut *tx, &check.sql, &check.params).await?;
    if deleted.is_empty() {
        return Ok(Filtered::new(deleted, stmt.warnings));
    }

    execute(&mut *tx, &stmt.sql, &stmt.params).await?;
    tx.commit().await?;

    Ok(Filtered::new(deleted, stmt.warnings))
}

/// Run arbitrary SQL in a transaction and return any rows it produces
pub async fn execute_sql(
    pool: &SqlitePool,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<Record>, SqliteError> {
    tracing::debug!(%sql, params = params.len(), "Executing raw SQL");

    let mut tx = begin_write(pool).await?;
    let rows = fetch_records(&mut *tx, sql, params).await?;
    tx.commit().await?;

    Ok(rows)
}

fn warn_if_unfiltered(table: &str, operation: &str, write_sql: &str, check_sql: &str) {
    if !check_sql.contains(" WHERE ") {
        tracing::warn!(%table, %operation, sql = %write_sql, "No usable filters, every row matches");
    }
}
