//! Progress logging utilities.

use log::info;

use crate::store::ResultStore;

/// Logs how many records have been scraped so far and the overall rate.
///
/// # Arguments
///
/// * `start_time` - When the scrape started
/// * `store` - The run's result store
pub fn log_progress(start_time: std::time::Instant, store: &ResultStore) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let records = store.len();
    let rate = if elapsed_secs > 0.0 {
        records as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Scraped {} records in {:.2} seconds (~{:.2} records/sec)",
        records, elapsed_secs, rate
    );
}
