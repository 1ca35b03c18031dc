//! Cooperative cancellation.
//!
//! `CancelSource` owns the `watch` sender; every evaluation receives a cloned
//! `CancelSignal`. Candidates poll `is_cancelled()` (or await `cancelled()`)
//! inside `prepare`/`commit`; `release` should still do its cleanup when the
//! signal is already raised.

use tokio::sync::watch;

use super::errors::ScorableError;

#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Raise the signal for every outstanding and future `CancelSignal`.
    pub fn cancel(&self) {
        // send_replace: succeeds even when no signal has been handed out yet
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// `Err(Cancelled)` once the signal is raised.
    pub fn check(&self) -> Result<(), ScorableError> {
        if self.is_cancelled() {
            return Err(ScorableError::Cancelled);
        }
        Ok(())
    }

    /// Resolves when the signal is raised. Pending forever for `never()` or
    /// when the source is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}
