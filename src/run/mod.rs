//! Scrape orchestration.
//!
//! `run_scrape` wires the store, flusher, shutdown coordinator, results
//! endpoint and workers together, waits for the workers at a join barrier,
//! and performs the final flush.

mod finalize;
mod init;
mod resources;
mod task;

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;

use crate::app::termination_signal;
use crate::config::Config;
use crate::export::FlushSummary;
use crate::store::ResultStore;
use crate::worker::WorkerReport;

use finalize::finalize_scrape;
use init::init_scrape_resources;
use task::{join_workers, spawn_background, spawn_workers};

/// Results of a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Records written by the final flush
    pub records: usize,
    /// Number of targets (workers started)
    pub targets: usize,
    /// Targets whose page could not be scraped
    pub failed_targets: usize,
    /// Workers stopped by a shutdown signal before finishing
    pub cancelled_workers: usize,
    /// Reports of workers that ran to completion, ordered by id
    pub workers: Vec<WorkerReport>,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
    pub json_output: PathBuf,
    pub csv_output: PathBuf,
    pub db_path: Option<PathBuf>,
    /// True if a shutdown signal ended the run
    pub interrupted: bool,
    /// Outcome of the final flush
    pub flush: FlushSummary,
    /// Snapshot writes performed, checkpoints included
    pub flushes: usize,
}

/// Runs a scrape with the provided configuration, stopping early on
/// SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error only for startup failures: invalid configuration, HTTP
/// client construction, or database setup. Fetch and write failures are
/// logged and reflected in the report.
///
/// # Example
///
/// ```no_run
/// use linkscrape::{run_scrape, Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let report = run_scrape(Config::default()).await?;
/// println!("Scraped {} records", report.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<ScrapeReport> {
    run_scrape_until(config, ResultStore::new(), termination_signal()).await
}

/// Runs a scrape into `store`, treating completion of `shutdown` as the
/// termination signal.
///
/// # Errors
///
/// Same as [`run_scrape`].
pub async fn run_scrape_until<S>(
    config: Config,
    store: ResultStore,
    shutdown: S,
) -> Result<ScrapeReport>
where
    S: Future<Output = ()> + Send + 'static,
{
    let resources = init_scrape_resources(config, store, shutdown).await?;

    let background = spawn_background(&resources);
    let workers = spawn_workers(&resources);
    let outcomes = join_workers(workers).await;

    Ok(finalize_scrape(resources, background, outcomes).await)
}
