//! linkscrape library: concurrent link scraping with exactly-once persistence
//!
//! Workers fetch target pages, extract the text and link of every element
//! matching a CSS selector, and append them to a shared in-memory store. The
//! store is served as JSON over HTTP while the scrape runs and is flushed to
//! JSON, CSV and an optional SQLite database exactly once at the end of the
//! run, whether it completes or is interrupted by SIGINT/SIGTERM.
//!
//! # Example
//!
//! ```no_run
//! use linkscrape::{run_scrape, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     targets: vec!["https://news.ycombinator.com/".to_string()],
//!     selector: ".titleline > a".to_string(),
//!     http_addr: None,
//!     ..Default::default()
//! };
//!
//! let report = run_scrape(config).await?;
//! println!("Scraped {} records from {} targets", report.records, report.targets);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
mod models;
mod results_server;
mod run;
pub mod storage;
mod store;
mod utils;
mod worker;

// Re-export public API
pub use app::{termination_signal, ShutdownCoordinator, ShutdownState};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{ConfigError, DatabaseError, ExportError, FetchError, InitializationError};
pub use models::ScrapedRecord;
pub use results_server::{results_router, start_results_server, ResultsServer};
pub use run::{run_scrape, run_scrape_until, ScrapeReport};
pub use store::ResultStore;
pub use worker::{ScrapeSettings, Worker, WorkerReport};
