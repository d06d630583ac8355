//! Flushing the result store to durable outputs.
//!
//! The final flush goes through a one-shot gate: the shutdown coordinator and
//! the orchestrator both call `flush_once`, the first caller writes, and every
//! other caller waits for that write and gets the same summary. Periodic
//! checkpoints write outside the gate and stop once the final flush is done.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{info, warn};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OnceCell};

use crate::export::{export_csv, export_json};
use crate::storage::replace_records;
use crate::store::ResultStore;

/// Where flushed records go.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Result of one flush. Each output fails independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Records in the snapshot that was written
    pub records: usize,
    pub json_written: bool,
    pub csv_written: bool,
    /// `None` when no database is configured
    pub db_written: Option<bool>,
}

impl FlushSummary {
    /// True when every configured output was written.
    pub fn is_complete(&self) -> bool {
        self.json_written && self.csv_written && self.db_written.unwrap_or(true)
    }
}

pub struct Flusher {
    store: ResultStore,
    paths: OutputPaths,
    db: Option<Arc<SqlitePool>>,
    final_flush: OnceCell<FlushSummary>,
    // Serializes whole writes so a checkpoint cannot land after the final flush.
    write_lock: Mutex<()>,
    writes: AtomicUsize,
}

impl Flusher {
    pub fn new(store: ResultStore, paths: OutputPaths, db: Option<Arc<SqlitePool>>) -> Self {
        Self {
            store,
            paths,
            db,
            final_flush: OnceCell::new(),
            write_lock: Mutex::new(()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Performs the final flush, or waits for and returns the one already done.
    pub async fn flush_once(&self) -> FlushSummary {
        self.final_flush
            .get_or_init(|| async {
                let _guard = self.write_lock.lock().await;
                let summary = self.write_snapshot().await;
                info!(
                    "Saved {} records to {} and {}",
                    summary.records,
                    self.paths.json.display(),
                    self.paths.csv.display()
                );
                summary
            })
            .await
            .clone()
    }

    /// Whether the final flush has completed.
    pub fn is_flushed(&self) -> bool {
        self.final_flush.initialized()
    }

    /// Writes an intermediate snapshot. Returns `None` once the final flush
    /// has happened.
    pub async fn checkpoint(&self) -> Option<FlushSummary> {
        if self.is_flushed() {
            return None;
        }
        let _guard = self.write_lock.lock().await;
        if self.is_flushed() {
            return None;
        }
        let summary = self.write_snapshot().await;
        log::debug!("Checkpoint wrote {} records", summary.records);
        Some(summary)
    }

    /// Number of snapshot writes performed so far (final flush and checkpoints).
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn write_snapshot(&self) -> FlushSummary {
        self.writes.fetch_add(1, Ordering::SeqCst);

        // Files are written while the store lock is held; the database gets
        // the same snapshot after the lock is released.
        let (mut summary, snapshot) = self.store.with_records(|records| {
            let json_written = match export_json(records, &self.paths.json) {
                Ok(()) => true,
                Err(e) => {
                    warn!("JSON export failed: {e}");
                    false
                }
            };
            let csv_written = match export_csv(records, &self.paths.csv) {
                Ok(()) => true,
                Err(e) => {
                    warn!("CSV export failed: {e}");
                    false
                }
            };
            let snapshot = self.db.as_ref().map(|_| records.to_vec());
            (
                FlushSummary {
                    records: records.len(),
                    json_written,
                    csv_written,
                    db_written: None,
                },
                snapshot,
            )
        });

        if let (Some(pool), Some(snapshot)) = (&self.db, snapshot) {
            summary.db_written = Some(match replace_records(pool, &snapshot).await {
                Ok(_) => true,
                Err(e) => {
                    warn!("Database write failed: {e}");
                    false
                }
            });
        }

        summary
    }
}
