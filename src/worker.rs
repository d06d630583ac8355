//! Scrape worker.
//!
//! One worker per target URL. It drives its own collector and appends every
//! matched element to the shared store; fetch errors are logged and counted
//! but never stop the worker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use url::Url;

use crate::error_handling::ConfigError;
use crate::fetch::{Collector, CollectorLimits};
use crate::models::ScrapedRecord;
use crate::store::ResultStore;

/// Extraction settings shared by every worker in a run.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// CSS selector for the elements to extract
    pub selector: String,
    /// Attribute holding each element's link
    pub attribute: String,
    /// Maximum in-flight requests per worker
    pub parallelism: usize,
    /// Politeness delay between requests
    pub delay: Duration,
}

/// What a single worker did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub target: String,
    /// Records appended to the store by this worker
    pub records: usize,
    /// Failed requests
    pub errors: usize,
}

pub struct Worker {
    id: usize,
    target: Url,
    store: ResultStore,
    client: Arc<reqwest::Client>,
    settings: Arc<ScrapeSettings>,
}

impl Worker {
    pub fn new(
        id: usize,
        target: Url,
        store: ResultStore,
        client: Arc<reqwest::Client>,
        settings: Arc<ScrapeSettings>,
    ) -> Self {
        Self {
            id,
            target,
            store,
            client,
            settings,
        }
    }

    /// Scrapes the target until the collector has nothing left to fetch.
    ///
    /// # Errors
    ///
    /// Only fails if the selector does not parse, which `Config::validate`
    /// rules out before workers are spawned.
    pub async fn run(self) -> Result<WorkerReport, ConfigError> {
        let id = self.id;
        info!("[worker {id}] Starting scrape of {}", self.target);

        let mut collector = Collector::new(
            Arc::clone(&self.client),
            CollectorLimits {
                parallelism: self.settings.parallelism,
                delay: self.settings.delay,
            },
        );

        let appended = Arc::new(AtomicUsize::new(0));
        let store = self.store.clone();
        let attribute = self.settings.attribute.clone();
        let appended_clone = Arc::clone(&appended);
        collector.on_html(&self.settings.selector, move |element| {
            let record = ScrapedRecord::new(element.text(), element.attr(&attribute));
            debug!("[worker {id}] Scraped: {}", record.title);
            store.append(record);
            appended_clone.fetch_add(1, Ordering::SeqCst);
        })?;

        collector.on_request(move |url| {
            info!("[worker {id}] Visiting: {url}");
        });

        collector.on_error(move |url, err| {
            warn!("[worker {id}] Error on {url}: {err}");
        });

        collector.visit(self.target.clone());
        let stats = collector.wait().await;

        let records = appended.load(Ordering::SeqCst);
        info!("[worker {id}] Finished scraping ({records} records, {} errors)", stats.errors);

        Ok(WorkerReport {
            id,
            target: self.target.to_string(),
            records,
            errors: stats.errors,
        })
    }
}
