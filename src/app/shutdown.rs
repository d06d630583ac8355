//! Signal-driven shutdown.
//!
//! The coordinator waits for a termination signal. When one arrives it stops
//! the scrape, performs the final flush through the flusher's one-shot gate,
//! and publishes each step on a watch channel:
//!
//! `Idle → SignalReceived → Flushing → Done`

use std::future::Future;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::export::Flusher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    /// Waiting for a signal
    Idle,
    /// A signal arrived; the scrape is being cancelled
    SignalReceived,
    /// Final flush in progress
    Flushing,
    /// Final flush finished; the process may exit
    Done,
}

pub struct ShutdownCoordinator {
    state: watch::Sender<ShutdownState>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ShutdownState::Idle);
        Self { state }
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShutdownState> {
        self.state.subscribe()
    }

    /// True once a signal has been received.
    pub fn is_triggered(&self) -> bool {
        self.state() != ShutdownState::Idle
    }

    /// Resolves once a signal has been received.
    pub async fn wait_triggered(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|s| *s != ShutdownState::Idle).await;
    }

    /// Resolves once the signal-triggered flush has completed.
    pub async fn wait_done(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|s| *s == ShutdownState::Done).await;
    }

    fn transition(&self, next: ShutdownState) {
        debug!("Shutdown state: {:?} -> {:?}", self.state(), next);
        self.state.send_replace(next);
    }

    /// Starts listening for `signal` in the background.
    ///
    /// On signal: cancels `scrape`, runs the final flush, then reaches `Done`.
    /// Cancelling `stop_listening` before a signal arrives ends the listener
    /// and leaves the state at `Idle`.
    pub fn spawn<S>(
        self: &Arc<Self>,
        signal: S,
        flusher: Arc<Flusher>,
        scrape: CancellationToken,
        stop_listening: CancellationToken,
    ) -> JoinHandle<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = signal => {}
                _ = stop_listening.cancelled() => {
                    debug!("Signal listener stopped");
                    return;
                }
            }

            coordinator.transition(ShutdownState::SignalReceived);
            info!("Saving scraped data before shutdown...");
            scrape.cancel();

            coordinator.transition(ShutdownState::Flushing);
            let summary = flusher.flush_once().await;

            coordinator.transition(ShutdownState::Done);
            info!("Shutdown flush complete ({} records)", summary.records);
        })
    }
}

/// Resolves on SIGINT (Ctrl-C) or, on unix, SIGTERM.
///
/// If a handler cannot be installed the error is logged and that signal is
/// ignored instead of triggering a shutdown.
pub async fn termination_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::OutputPaths;
    use crate::models::ScrapedRecord;
    use crate::store::ResultStore;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    fn flusher(dir: &TempDir, store: ResultStore) -> Arc<Flusher> {
        Arc::new(Flusher::new(
            store,
            OutputPaths {
                json: dir.path().join("output.json"),
                csv: dir.path().join("output.csv"),
            },
            None,
        ))
    }

    #[tokio::test]
    async fn test_signal_runs_state_machine_and_flushes() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new();
        store.append(ScrapedRecord::new("before signal", "/x"));
        let flusher = flusher(&dir, store);

        let coordinator = Arc::new(ShutdownCoordinator::new());
        assert_eq!(coordinator.state(), ShutdownState::Idle);

        let mut states = coordinator.subscribe();
        let (tx, rx) = oneshot::channel::<()>();
        let scrape = CancellationToken::new();
        let handle = coordinator.spawn(
            async move {
                let _ = rx.await;
            },
            Arc::clone(&flusher),
            scrape.clone(),
            CancellationToken::new(),
        );

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), coordinator.wait_done())
            .await
            .expect("coordinator should reach Done");
        handle.await.unwrap();

        assert!(scrape.is_cancelled());
        assert!(coordinator.is_triggered());
        assert!(flusher.is_flushed());
        assert_eq!(flusher.writes(), 1);
        // The receiver saw at least the final state.
        assert_eq!(*states.borrow_and_update(), ShutdownState::Done);

        let saved: Vec<ScrapedRecord> = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("output.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn test_stop_listening_leaves_idle_without_flush() {
        let dir = TempDir::new().unwrap();
        let flusher = flusher(&dir, ResultStore::new());
        let coordinator = Arc::new(ShutdownCoordinator::new());
        let stop = CancellationToken::new();
        let scrape = CancellationToken::new();

        let handle = coordinator.spawn(
            std::future::pending::<()>(),
            Arc::clone(&flusher),
            scrape.clone(),
            stop.clone(),
        );
        stop.cancel();
        handle.await.unwrap();

        assert_eq!(coordinator.state(), ShutdownState::Idle);
        assert!(!scrape.is_cancelled());
        assert_eq!(flusher.writes(), 0);
    }

    #[tokio::test]
    async fn test_signal_after_final_flush_does_not_rewrite() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new();
        let flusher = flusher(&dir, store.clone());
        store.append(ScrapedRecord::new("a", "/a"));
        flusher.flush_once().await;

        let coordinator = Arc::new(ShutdownCoordinator::new());
        let handle = coordinator.spawn(
            async {},
            Arc::clone(&flusher),
            CancellationToken::new(),
            CancellationToken::new(),
        );
        handle.await.unwrap();

        assert_eq!(coordinator.state(), ShutdownState::Done);
        assert_eq!(flusher.writes(), 1);
    }

    #[tokio::test]
    async fn test_wait_triggered_resolves_on_signal() {
        let dir = TempDir::new().unwrap();
        let coordinator = Arc::new(ShutdownCoordinator::new());
        let (tx, rx) = oneshot::channel::<()>();
        let _handle = coordinator.spawn(
            async move {
                let _ = rx.await;
            },
            flusher(&dir, ResultStore::new()),
            CancellationToken::new(),
            CancellationToken::new(),
        );

        let waiting = tokio::time::timeout(Duration::from_millis(50), coordinator.wait_triggered()).await;
        assert!(waiting.is_err(), "must not resolve before a signal");

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), coordinator.wait_triggered())
            .await
            .expect("resolves after signal");
    }
}
