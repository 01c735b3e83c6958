//! Centralized shutdown management

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::data::SqliteService;

/// Cancels in-flight work on Ctrl+C/SIGTERM and closes the database
#[derive(Clone)]
pub struct ShutdownService {
    cancel: CancellationToken,
    database: Arc<SqliteService>,
}

impl ShutdownService {
    pub fn new(database: Arc<SqliteService>) -> Self {
        Self {
            cancel: CancellationToken::new(),
            database,
        }
    }

    /// Token passed to every write; cancelled on shutdown
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Trigger shutdown
    pub fn trigger(&self) {
        self.cancel.cancel();
    }

    /// Cancel pending writes and close the pool
    pub async fn shutdown(&self) {
        tracing::debug!("Initiating shutdown...");
        self.trigger();
        self.database.close().await;
        tracing::debug!("Shutdown complete");
    }

    /// Install OS signal handlers and auto-trigger on Ctrl+C/SIGTERM
    pub fn install_signal_handlers(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut signal) => {
                        signal.recv().await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::debug!("Received Ctrl+C, cancelling"),
                _ = terminate => tracing::debug!("Received SIGTERM, cancelling"),
                _ = cancel.cancelled() => return,
            }

            cancel.cancel();
        });
    }
}
