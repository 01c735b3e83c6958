use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::commands::{
    Command, DeleteInput, ExecuteSqlInput, InsertInput, QueryInput, RelationshipsInput,
    TableInput, UpdateInput,
};
use crate::data::query::{Conditions, QueryOptions};

use super::constants::{ENV_CONFIG, ENV_DB_PATH, ENV_IN_MEMORY, ENV_MAX_CONNECTIONS, ENV_SCHEMA};

#[derive(Parser)]
#[command(name = "postlite")]
#[command(version, about = "PostgREST-style filters and CRUD over SQLite", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = ENV_DB_PATH)]
    pub db_path: Option<PathBuf>,

    /// Schema SQL applied at startup if the file exists
    #[arg(long, global = true, env = ENV_SCHEMA)]
    pub schema: Option<PathBuf>,

    /// Use a private in-memory database (nothing is written to disk)
    #[arg(long, global = true, env = ENV_IN_MEMORY)]
    pub in_memory: bool,

    /// Connection pool size
    #[arg(long, global = true, env = ENV_MAX_CONNECTIONS)]
    pub max_connections: Option<u32>,
}

/// Row selection shared by query, update and delete
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Equality filters as a JSON object, e.g. '{"status":"open"}'
    #[arg(long)]
    pub filters: Option<String>,

    /// Comma-joined column.operator.value expressions, e.g. 'age.gt.21,name.like.J%'
    #[arg(long)]
    pub raw_filters: Option<String>,
}

impl FilterArgs {
    fn into_conditions(self) -> Result<Conditions> {
        let filters = self
            .filters
            .as_deref()
            .map(|s| parse_json(s, "--filters"))
            .transpose()?;
        Ok(Conditions::new(filters, self.raw_filters))
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Select rows from a table
    Query {
        table: String,
        /// Column list (default *)
        #[arg(long)]
        select: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
        /// column, column.asc or column.desc
        #[arg(long)]
        order: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
    },
    /// Insert a row and print it as stored
    Insert {
        table: String,
        /// Column values as a JSON object
        data: String,
    },
    /// Update matching rows and print the number changed
    Update {
        table: String,
        /// Column values as a JSON object
        data: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Delete matching rows and print them
    Delete {
        table: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List tables
    Tables,
    /// Show columns and foreign keys of a table
    Describe { table: String },
    /// Show foreign keys of one table or of all tables
    Relationships { table: Option<String> },
    /// Execute raw SQL
    Sql {
        query: String,
        /// Bind values as a JSON array
        #[arg(long)]
        params: Option<String>,
        /// Allow statements containing drop, truncate, delete, update or alter
        #[arg(long = "unsafe")]
        allow_unsafe: bool,
    },
    /// Read one JSON command per line from stdin, write one JSON result per line
    Batch,
}

impl Commands {
    /// Convert to a table command; `None` for `batch`
    pub fn into_command(self) -> Result<Option<Command>> {
        let command = match self {
            Self::Query {
                table,
                select,
                filter,
                order,
                limit,
                offset,
            } => Command::QueryDb(QueryInput {
                table,
                options: QueryOptions {
                    select,
                    conditions: filter.into_conditions()?,
                    order,
                    limit,
                    offset,
                },
            }),
            Self::Insert { table, data } => Command::InsertDb(InsertInput {
                table,
                data: parse_json(&data, "data")?,
            }),
            Self::Update {
                table,
                data,
                filter,
            } => Command::UpdateDb(UpdateInput {
                table,
                data: parse_json(&data, "data")?,
                conditions: filter.into_conditions()?,
            }),
            Self::Delete { table, filter } => Command::DeleteDb(DeleteInput {
                table,
                conditions: filter.into_conditions()?,
            }),
            Self::Tables => Command::ListDbTables {},
            Self::Describe { table } => Command::DescribeDbTable(TableInput { table }),
            Self::Relationships { table } => {
                Command::GetDbRelationships(RelationshipsInput { table })
            }
            Self::Sql {
                query,
                params,
                allow_unsafe,
            } => Command::ExecuteSql(ExecuteSqlInput {
                query,
                params: params
                    .as_deref()
                    .map(|s| parse_json(s, "--params"))
                    .transpose()?
                    .unwrap_or_default(),
                allow_unsafe,
            }),
            Self::Batch => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON for {}: {}", what, raw))
}

/// Global options that feed configuration
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub in_memory: bool,
    pub max_connections: Option<u32>,
}

pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        db_path: cli.db_path,
        schema: cli.schema,
        in_memory: cli.in_memory,
        max_connections: cli.max_connections,
    };
    (config, cli.command)
}
