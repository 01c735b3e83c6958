//! Schema introspection
//!
//! Uses the `pragma_*` table-valued functions so the table name is bound
//! rather than spliced into the statement.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{ColumnInfo, Relationship};

/// User tables by name, excluding SQLite's internal `sqlite_*` tables
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, SqliteError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Column metadata in declaration order. Unknown tables yield no columns.
pub async fn describe_table(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnInfo>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, i64, Option<String>, i64)>(
        r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid"#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(name, data_type, not_null, default, pk)| ColumnInfo {
            column_name: name,
            data_type,
            is_nullable: if not_null == 0 { "YES" } else { "NO" }.to_string(),
            column_default: default,
            is_primary_key: pk > 0,
        })
        .collect())
}

/// Foreign keys declared on `table`, or on every user table when `None`
pub async fn table_relationships(
    pool: &SqlitePool,
    table: Option<&str>,
) -> Result<Vec<Relationship>, SqliteError> {
    let tables = match table {
        Some(t) => vec![t.to_string()],
        None => list_tables(pool).await?,
    };

    let mut edges = Vec::new();
    for t in &tables {
        edges.extend(foreign_keys(pool, t).await?);
    }
    Ok(edges)
}

async fn foreign_keys(pool: &SqlitePool, table: &str) -> Result<Vec<Relationship>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, Option<String>)>(
        r#"SELECT "from", "table", "to" FROM pragma_foreign_key_list(?) ORDER BY id, seq"#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(from, foreign_table, to)| Relationship {
            table_name: table.to_string(),
            column_name: from,
            foreign_table_name: foreign_table,
            foreign_column_name: to,
        })
        .collect())
}
