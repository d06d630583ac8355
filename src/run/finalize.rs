//! Scrape finalization and cleanup.
//!
//! This module contains the `finalize_scrape` function which runs after the
//! join barrier: final flush, optional serving until a signal, shutdown of
//! the coordinator, background tasks, server, and database pool.

use log::{debug, info};

use crate::app::{log_progress, ShutdownState};

use super::resources::{BackgroundTasks, ScrapeResources, WorkerOutcomes};
use super::ScrapeReport;

/// Finalize a scrape and produce the report.
///
/// Steps:
/// 1. Final flush through the flush-once gate
/// 2. With `serve_after_scrape`, keep serving until a signal arrives
/// 3. Retire the signal listener, or wait for its flush if a signal came in
/// 4. Stop background tasks and the results endpoint
/// 5. Checkpoint and close the database
pub async fn finalize_scrape(
    resources: ScrapeResources,
    background: BackgroundTasks,
    outcomes: WorkerOutcomes,
) -> ScrapeReport {
    let summary = resources.flusher.flush_once().await;

    if resources.config.serve_after_scrape && !resources.coordinator.is_triggered() {
        if let Some(server) = &resources.server {
            info!(
                "Scrape finished; serving results at http://{}/results until interrupted",
                server.local_addr()
            );
            resources.coordinator.wait_triggered().await;
        }
    }

    // Any signal that arrived is handled to completion before the listener
    // is awaited; otherwise the listener is cancelled while still Idle.
    if resources.coordinator.is_triggered() {
        resources.coordinator.wait_done().await;
    }
    resources.stop_listening.cancel();
    if let Err(e) = resources.signal_task.await {
        log::warn!("Signal listener task failed: {:?}", e);
    }
    let interrupted = resources.coordinator.state() == ShutdownState::Done;

    background.stop().await;
    log_progress(resources.start_time, &resources.store);

    if let Some(server) = resources.server {
        server.shutdown().await;
    }

    if let Some(pool) = &resources.pool {
        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(pool.as_ref())
            .await
        {
            log::warn!("Failed to checkpoint WAL file (this is non-critical): {}", e);
        }
        pool.close().await;
        debug!("Database pool closed");
    }

    let elapsed_seconds = resources.start_time.elapsed().as_secs_f64();
    info!("Scraping finished in {:.2}s", elapsed_seconds);

    ScrapeReport {
        records: summary.records,
        targets: resources.targets.len(),
        failed_targets: outcomes.failed_targets,
        cancelled_workers: outcomes.cancelled,
        workers: outcomes.reports,
        elapsed_seconds,
        json_output: resources.config.json_output,
        csv_output: resources.config.csv_output,
        db_path: resources.config.db_path,
        interrupted,
        flush: summary,
        flushes: resources.flusher.writes(),
    }
}
