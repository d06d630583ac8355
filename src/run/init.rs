//! Scrape resource initialization.
//!
//! This module contains the `init_scrape_resources` function which handles
//! all setup before the first worker is spawned.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::app::ShutdownCoordinator;
use crate::config::Config;
use crate::export::{Flusher, OutputPaths};
use crate::initialization::{init_client, init_crypto_provider};
use crate::results_server::start_results_server;
use crate::storage::{init_db_pool_with_path, run_migrations};
use crate::store::ResultStore;
use crate::worker::ScrapeSettings;

use super::resources::ScrapeResources;

/// Initialize all resources needed for a scrape.
///
/// This function performs the following steps:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Open the optional database and run migrations
/// 4. Build the flusher
/// 5. Start the shutdown coordinator listening on `shutdown`
/// 6. Start the results endpoint (a bind failure is logged and skipped)
///
/// # Errors
///
/// Returns an error if validation, client construction, or database setup
/// fails. Nothing is spawned before those steps succeed.
pub async fn init_scrape_resources<S>(
    config: Config,
    store: ResultStore,
    shutdown: S,
) -> Result<ScrapeResources>
where
    S: Future<Output = ()> + Send + 'static,
{
    config
        .validate()
        .context("Configuration validation failed")?;

    let targets = config
        .targets
        .iter()
        .map(|t| Url::parse(t).with_context(|| format!("Invalid target URL: {t}")))
        .collect::<Result<Vec<_>>>()?;

    init_crypto_provider();
    let client = init_client(&config).context("Failed to initialize HTTP client")?;

    let pool = match &config.db_path {
        Some(path) => {
            let pool = init_db_pool_with_path(path)
                .await
                .context("Failed to initialize database pool")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Persisting records to database {}", path.display());
            Some(pool)
        }
        None => None,
    };

    let flusher = Arc::new(Flusher::new(
        store.clone(),
        OutputPaths {
            json: config.json_output.clone(),
            csv: config.csv_output.clone(),
        },
        pool.clone(),
    ));

    let coordinator = Arc::new(ShutdownCoordinator::new());
    let scrape_cancel = CancellationToken::new();
    let stop_listening = CancellationToken::new();
    let signal_task = coordinator.spawn(
        shutdown,
        Arc::clone(&flusher),
        scrape_cancel.clone(),
        stop_listening.clone(),
    );

    let server = match config.http_addr {
        Some(addr) => match start_results_server(addr, store.clone()).await {
            Ok(server) => Some(server),
            Err(e) => {
                warn!("{e:#}. Continuing without the results endpoint.");
                None
            }
        },
        None => None,
    };

    let settings = Arc::new(ScrapeSettings {
        selector: config.selector.clone(),
        attribute: config.attribute.clone(),
        parallelism: config.parallelism,
        delay: config.delay(),
    });

    info!(
        "Scraping {} target{} with selector '{}'",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" },
        config.selector
    );

    Ok(ScrapeResources {
        store,
        flusher,
        pool,
        client,
        settings,
        targets,
        coordinator,
        scrape_cancel,
        stop_listening,
        signal_task,
        server,
        start_time: Instant::now(),
        config,
    })
}
