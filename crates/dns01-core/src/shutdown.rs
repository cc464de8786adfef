//! Shutdown signalling between the host and in-flight solver calls
//!
//! The host keeps the [`ShutdownTrigger`] and hands the [`ShutdownSignal`] to
//! `Solver::initialize`. Every network call the solver makes races against
//! the signal, so a shutdown aborts work instead of waiting out timeouts.

use std::future::Future;
use tokio::sync::watch;

/// Host side: fires the shutdown signal
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Signal shutdown to every clone of the paired [`ShutdownSignal`]
    pub fn trigger(&self) {
        // send_replace stores the value even with no receivers alive
        self.tx.send_replace(true);
    }
}

/// Solver side: observes the shutdown signal
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl ShutdownSignal {
    /// Create a connected trigger / signal pair
    pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, ShutdownSignal { rx: Some(rx) })
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self::default()
    }

    /// Whether shutdown has been signalled
    pub fn is_triggered(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once shutdown is signalled
    ///
    /// Never resolves if the trigger is dropped without firing.
    pub async fn triggered(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        let closed = rx.wait_for(|fired| *fired).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }

    /// Run `fut`, failing with [`crate::Error::Cancelled`] if shutdown is
    /// signalled first
    pub async fn guard<T, F>(&self, operation: &str, fut: F) -> crate::Result<T>
    where
        F: Future<Output = crate::Result<T>>,
    {
        if self.is_triggered() {
            return Err(crate::Error::cancelled(format!(
                "{} not started: shutdown in progress",
                operation
            )));
        }

        tokio::select! {
            biased;
            _ = self.triggered() => {
                tracing::warn!("Shutdown signalled, aborting {}", operation);
                Err(crate::Error::cancelled(format!("{} aborted by shutdown", operation)))
            }
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_passes_result_through() {
        let signal = ShutdownSignal::never();
        let value = signal.guard("lookup", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_guard_aborts_in_flight_call() {
        let (trigger, signal) = ShutdownSignal::channel();

        let handle = tokio::spawn(async move {
            signal
                .guard("create record", async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(())
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.trigger();

        let err = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("guard should return promptly")
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_guard_refuses_to_start_after_shutdown() {
        let (trigger, signal) = ShutdownSignal::channel();
        trigger.trigger();

        assert!(signal.is_triggered());
        let err = signal.guard("lookup", async { Ok(()) }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_fires() {
        let (trigger, signal) = ShutdownSignal::channel();
        drop(trigger);

        assert!(!signal.is_triggered());
        let fired = tokio::time::timeout(Duration::from_millis(20), signal.triggered()).await;
        assert!(fired.is_err());
    }
}
