//! SQLite database service
//!
//! Owns the connection pool for one database, either a file on disk or a
//! private in-memory database that lives as long as the service.
//! - `tables` - CRUD over arbitrary tables plus raw SQL
//! - `catalog` - table, column and foreign key introspection
//! - `rows` - parameter binding and row decoding

pub mod catalog;
pub mod error;
mod repository_impl;
mod rows;
pub mod tables;

pub use error::SqliteError;
pub use sqlx::SqlitePool;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;

/// SQLite database service
///
/// Created once at startup, shared through the `Database` facade and
/// closed on shutdown.
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Open the database described by `config` and apply its schema file.
    ///
    /// A schema file that is missing is skipped; one that fails to apply is
    /// logged and startup continues.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, SqliteError> {
        let service = if config.in_memory {
            Self::in_memory().await?
        } else {
            Self::open_file(&config.path, config).await?
        };

        if let Some(schema_path) = config.schema_path.as_deref() {
            service.apply_schema_file(schema_path).await;
        }

        Ok(service)
    }

    /// Private in-memory database on a single connection that is never
    /// recycled, so its contents survive for the life of the pool.
    pub async fn in_memory() -> Result<Self, SqliteError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true)
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::debug!("SqliteService initialized in memory");
        Ok(Self { pool })
    }

    async fn open_file(db_path: &Path, config: &DatabaseConfig) -> Result<Self, SqliteError> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %db_path.display(), "SqliteService initialized");
        Ok(Self { pool })
    }

    async fn apply_schema_file(&self, path: &Path) {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No schema file, skipping");
            return;
        }

        let result = match tokio::fs::read_to_string(path).await {
            Ok(sql) => self.apply_schema(&sql).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => tracing::info!(path = %path.display(), "Schema applied"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to apply schema"),
        }
    }

    /// Run a multi-statement schema script in one transaction
    pub async fn apply_schema(&self, sql: &str) -> Result<(), SqliteError> {
        let mut tx = self.pool.begin().await?;
        sqlx::raw_sql(sql).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}
