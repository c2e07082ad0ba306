//! Shutdown coordination for the proxy.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of waiting for a task to drain.
#[derive(Debug, PartialEq, Eq)]
pub enum Drained<T> {
    /// The task finished within the grace period.
    Completed(T),
    /// The task panicked or was cancelled.
    Failed,
    /// The grace period elapsed; the task was aborted.
    TimedOut,
}

/// Wait up to `grace` for `task` to finish, aborting it afterwards.
pub async fn drain<T>(mut task: JoinHandle<T>, grace: Duration) -> Drained<T> {
    match tokio::time::timeout(grace, &mut task).await {
        Ok(Ok(value)) => Drained::Completed(value),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Task failed while draining");
            Drained::Failed
        }
        Err(_) => {
            task.abort();
            Drained::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_observe_trigger() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.trigger();
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn drain_returns_completed_value() {
        let task = tokio::spawn(async { 42 });
        assert_eq!(drain(task, Duration::from_secs(1)).await, Drained::Completed(42));
    }

    #[tokio::test]
    async fn drain_times_out_slow_task() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        assert_eq!(drain(task, Duration::from_millis(20)).await, Drained::TimedOut);
    }
}
