//! Worker and background task management.
//!
//! Workers run in a `JoinSet`, each raced against the scrape cancellation
//! token. Progress logging and checkpoints run as separate ticking tasks
//! until the orchestrator stops them.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::app::log_progress;
use crate::config::LOGGING_INTERVAL;
use crate::error_handling::ConfigError;
use crate::worker::{Worker, WorkerReport};

use super::resources::{BackgroundTasks, ScrapeResources, WorkerOutcomes};

/// How a single worker task ended.
pub enum WorkerExit {
    Finished(Result<WorkerReport, ConfigError>),
    Cancelled { id: usize },
}

/// Spawns one worker per target. Worker ids start at 1.
pub fn spawn_workers(resources: &ScrapeResources) -> JoinSet<WorkerExit> {
    let mut workers = JoinSet::new();
    for (index, target) in resources.targets.iter().enumerate() {
        let id = index + 1;
        let worker = Worker::new(
            id,
            target.clone(),
            resources.store.clone(),
            Arc::clone(&resources.client),
            Arc::clone(&resources.settings),
        );
        let cancel = resources.scrape_cancel.clone();
        workers.spawn(async move {
            tokio::select! {
                result = worker.run() => WorkerExit::Finished(result),
                _ = cancel.cancelled() => WorkerExit::Cancelled { id },
            }
        });
    }
    workers
}

/// Join barrier: waits for every worker and tallies the outcomes.
pub async fn join_workers(mut workers: JoinSet<WorkerExit>) -> WorkerOutcomes {
    let mut outcomes = WorkerOutcomes::default();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(WorkerExit::Finished(Ok(report))) => {
                if report.errors > 0 {
                    outcomes.failed_targets += 1;
                }
                outcomes.reports.push(report);
            }
            Ok(WorkerExit::Finished(Err(e))) => {
                warn!("Worker failed: {e}");
                outcomes.failed_targets += 1;
            }
            Ok(WorkerExit::Cancelled { id }) => {
                debug!("[worker {id}] Cancelled");
                outcomes.cancelled += 1;
            }
            Err(join_error) => {
                warn!("Worker task panicked: {:?}", join_error);
                outcomes.failed_targets += 1;
            }
        }
    }
    outcomes.reports.sort_by_key(|r| r.id);
    outcomes
}

/// Starts the progress logger and, if configured, the checkpoint ticker.
pub fn spawn_background(resources: &ScrapeResources) -> BackgroundTasks {
    let cancel = CancellationToken::new();
    let mut handles = Vec::new();

    let store = resources.store.clone();
    let start_time = resources.start_time;
    let cancel_logging = cancel.child_token();
    handles.push(tokio::spawn(async move {
        let period = Duration::from_secs(LOGGING_INTERVAL);
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            tokio::select! {
                _ = interval.tick() => log_progress(start_time, &store),
                _ = cancel_logging.cancelled() => break,
            }
        }
    }));

    if let Some(secs) = resources.config.checkpoint_secs {
        let flusher = Arc::clone(&resources.flusher);
        let cancel_checkpoint = cancel.child_token();
        handles.push(tokio::spawn(async move {
            let period = Duration::from_secs(secs);
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if flusher.checkpoint().await.is_none() {
                            break;
                        }
                    }
                    _ = cancel_checkpoint.cancelled() => break,
                }
            }
        }));
    }

    BackgroundTasks { cancel, handles }
}
