//! Mount-time property load and the liveness flag guarding its results

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::api::{Property, PropertySource};

/// Shared "still mounted" flag.
///
/// Clones observe the same flag. Once revoked it never becomes live again.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one property load, already reduced to what the dashboard needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Vec<Property>),
    Failed,
}

/// Run the listing request. Every failure becomes `Failed`; the cause is
/// only logged.
pub async fn fetch_properties(source: &dyn PropertySource) -> LoadOutcome {
    match source.list_properties().await {
        Ok(envelope) => {
            let list = envelope.into_list();
            tracing::info!(count = list.len(), "Loaded properties");
            LoadOutcome::Loaded(list)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load properties");
            LoadOutcome::Failed
        }
    }
}

/// What a poll of a pending load found
#[derive(Debug, PartialEq, Eq)]
pub enum LoadPoll {
    Pending,
    Ready(LoadOutcome),
    /// The fetch finished after unmount and dropped its result, or the
    /// result was already handed out
    Abandoned,
}

/// Handle on a fetch running in the background
pub struct PendingLoad {
    // Taken once the load reaches a terminal state
    rx: Option<oneshot::Receiver<LoadOutcome>>,
}

impl PendingLoad {
    /// Spawn the fetch. The result is only delivered while `liveness` holds.
    pub(crate) fn spawn(source: Arc<dyn PropertySource>, liveness: Liveness) -> Self {
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let outcome = fetch_properties(source.as_ref()).await;
            if !liveness.is_live() {
                tracing::debug!("Dashboard unmounted before load finished, dropping result");
                return;
            }
            let _ = tx.send(outcome);
        });

        Self { rx: Some(rx) }
    }

    /// Non-blocking check, called from the UI tick
    ///
    /// After `Ready` or `Abandoned` has been reported, later polls report
    /// `Abandoned`.
    pub fn poll(&mut self) -> LoadPoll {
        let Some(rx) = self.rx.as_mut() else {
            return LoadPoll::Abandoned;
        };

        match rx.try_recv() {
            Ok(outcome) => {
                self.rx = None;
                LoadPoll::Ready(outcome)
            }
            Err(oneshot::error::TryRecvError::Empty) => LoadPoll::Pending,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.rx = None;
                LoadPoll::Abandoned
            }
        }
    }

    /// Wait for the fetch. `None` if its result was dropped after unmount or
    /// was already taken by `poll`.
    pub async fn wait(self) -> Option<LoadOutcome> {
        self.rx?.await.ok()
    }
}
