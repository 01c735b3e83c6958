//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::commands::{Command, CommandOutput};
use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::{DataError, Database, SqliteService};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Database,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;
        let app = Self::init(config).await?;
        app.shutdown.install_signal_handlers();

        let result = app.dispatch(command).await;
        app.shutdown.shutdown().await;
        result
    }

    async fn init(config: AppConfig) -> Result<Self> {
        let service = Arc::new(
            SqliteService::init(&config.database)
                .await
                .context("Failed to open database")?,
        );
        let database = Database::new(service.clone());
        let shutdown = ShutdownService::new(service);

        Ok(Self {
            shutdown,
            config,
            database,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries command results
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(false)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn dispatch(&self, command: Commands) -> Result<()> {
        let cancel = self.shutdown.token();
        match command.into_command()? {
            Some(command) => {
                let output = command
                    .execute(&self.database, cancel)
                    .await
                    .map_err(|e| anyhow::anyhow!("{} ({})", e, e.kind()))?;
                print_output(&output)
            }
            None => self.run_batch(cancel).await,
        }
    }

    /// Execute newline-delimited JSON commands from stdin.
    ///
    /// A line that fails to parse or execute produces an `{"error": ...}`
    /// line and processing continues. Stops at end of input or on shutdown.
    async fn run_batch(&self, cancel: &CancellationToken) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut executed = 0usize;
        let mut failed = 0usize;

        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Batch interrupted");
                    break;
                }
                line = lines.next_line() => line.context("Failed to read stdin")?,
            };
            let Some(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            let outcome = match serde_json::from_str::<Command>(&line) {
                Ok(command) => command.execute(&self.database, cancel).await,
                Err(e) => {
                    println!("{}", json!({"error": {"kind": "InvalidCommand", "message": e.to_string()}}));
                    failed += 1;
                    continue;
                }
            };

            match outcome {
                Ok(output) => print_output(&output)?,
                Err(e) => {
                    tracing::warn!(kind = e.kind(), error = %e, "Batch command failed");
                    println!("{}", error_line(&e));
                    failed += 1;
                }
            }
            executed += 1;
        }

        tracing::debug!(executed, failed, "Batch finished");
        Ok(())
    }
}

fn print_output(output: &CommandOutput) -> Result<()> {
    let line = serde_json::to_string(output).context("Failed to serialize result")?;
    println!("{}", line);
    Ok(())
}

fn error_line(e: &DataError) -> serde_json::Value {
    json!({"error": {"kind": e.kind(), "message": e.to_string()}})
}
