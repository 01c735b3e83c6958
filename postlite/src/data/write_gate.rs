//! Exclusive write section
//!
//! All mutations pass through one `WriteGate` so at most one writer touches
//! the database at a time. Waiting for the gate can be cancelled.

use std::future::Future;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::data::error::DataError;

#[derive(Debug, Default)]
pub struct WriteGate {
    lock: Mutex<()>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` while holding the gate.
    ///
    /// Returns `DataError::Cancelled` without running `work` if `cancel`
    /// fires before the gate is acquired, including when it already has.
    pub async fn run<T, F>(&self, cancel: &CancellationToken, work: F) -> Result<T, DataError>
    where
        F: Future<Output = Result<T, DataError>>,
    {
        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Cancelled while waiting for write gate");
                return Err(DataError::Cancelled);
            }
            guard = self.lock.lock() => guard,
        };
        work.await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_runs_work() {
        let gate = WriteGate::new();
        let cancel = CancellationToken::new();
        let value = gate.run(&cancel, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_work() {
        let gate = WriteGate::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let ran = AtomicBool::new(false);
        let result = gate
            .run(&cancel, async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(DataError::Cancelled)));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let gate = Arc::new(WriteGate::new());
        let held = gate.lock.lock().await;

        let cancel = CancellationToken::new();
        let waiter = {
            let gate = Arc::clone(&gate);
            let cancel = cancel.clone();
            tokio::spawn(async move { gate.run(&cancel, async { Ok(()) }).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(DataError::Cancelled)));
        drop(held);
    }

    #[tokio::test]
    async fn test_serializes_writers() {
        let gate = Arc::new(WriteGate::new());
        let active = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let gate = Arc::clone(&gate);
            let active = Arc::clone(&active);
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                gate.run(&cancel, async {
                    assert!(!active.swap(true, Ordering::SeqCst));
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    active.store(false, Ordering::SeqCst);
                    Ok(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    }
}
