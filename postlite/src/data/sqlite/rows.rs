//! Parameter binding and row decoding

use serde_json::{Number, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{Column, Executor, Row, Sqlite, TypeInfo, ValueRef};

use crate::data::filters::SqlValue;
use crate::data::types::Record;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind values to `?` placeholders in order
fn bind_params<'q>(mut query: SqliteQuery<'q>, params: &'q [SqlValue]) -> SqliteQuery<'q> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}

/// Run a statement and decode every returned row
pub(super) async fn fetch_records<'c, E>(
    executor: E,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<Record>, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows = bind_params(sqlx::query(sql), params)
        .fetch_all(executor)
        .await?;
    rows.iter().map(record_from_row).collect()
}

/// Run a statement that returns no rows
pub(super) async fn execute<'c, E>(
    executor: E,
    sql: &str,
    params: &[SqlValue],
) -> Result<SqliteQueryResult, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
{
    bind_params(sqlx::query(sql), params)
        .execute(executor)
        .await
}

/// Decode a row by the storage class of each value.
///
/// BLOBs become lowercase hex strings; NaN and infinite REALs become null.
fn record_from_row(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info().name().to_string();
            match storage.as_str() {
                "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(idx)?),
                "REAL" => Number::from_f64(row.try_get_unchecked::<f64, _>(idx)?)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "BLOB" => Value::String(hex::encode(row.try_get_unchecked::<Vec<u8>, _>(idx)?)),
                _ => Value::String(row.try_get_unchecked::<String, _>(idx)?),
            }
        };

        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}
