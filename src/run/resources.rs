//! Scrape resources and state management.
//!
//! This module defines the `ScrapeResources` struct which holds everything
//! initialized for a scrape before the first worker is spawned.

use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::app::ShutdownCoordinator;
use crate::config::Config;
use crate::export::Flusher;
use crate::results_server::ResultsServer;
use crate::store::ResultStore;
use crate::worker::{ScrapeSettings, WorkerReport};

/// All resources initialized for a scrape.
pub struct ScrapeResources {
    // Shared state
    /// The run's result store
    pub store: ResultStore,
    /// Final flush gate and checkpoint writer
    pub flusher: Arc<Flusher>,
    /// Optional database pool (closed during finalization)
    pub pool: Option<Arc<SqlitePool>>,

    // Scraping
    /// Shared HTTP client
    pub client: Arc<reqwest::Client>,
    /// Extraction settings handed to every worker
    pub settings: Arc<ScrapeSettings>,
    /// Parsed target URLs, one worker each
    pub targets: Vec<Url>,

    // Shutdown
    /// Signal-driven shutdown state machine
    pub coordinator: Arc<ShutdownCoordinator>,
    /// Cancelled by the coordinator when a signal arrives
    pub scrape_cancel: CancellationToken,
    /// Cancelled by the orchestrator to retire the signal listener
    pub stop_listening: CancellationToken,
    /// Handle to the signal listener task
    pub signal_task: JoinHandle<()>,

    /// Results endpoint, if enabled and bound
    pub server: Option<ResultsServer>,

    /// Start time for elapsed time calculations
    pub start_time: Instant,

    /// Run configuration (output paths and flags used during finalization)
    pub config: Config,
}

/// Periodic background tasks (progress logging, checkpoints).
pub struct BackgroundTasks {
    /// Cancels every task in `handles`
    pub cancel: CancellationToken,
    pub handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Cancels the tasks and waits for them to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        for handle in self.handles {
            if let Err(e) = handle.await {
                log::warn!("Background task failed: {:?}", e);
            }
        }
    }
}

/// What the workers did, collected at the join barrier.
#[derive(Debug, Default)]
pub struct WorkerOutcomes {
    /// Reports of workers that ran to completion
    pub reports: Vec<WorkerReport>,
    /// Targets whose page could not be scraped (fetch error, worker error, panic)
    pub failed_targets: usize,
    /// Workers stopped by the scrape cancellation token
    pub cancelled: usize,
}
