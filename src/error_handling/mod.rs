//! Error handling.
//!
//! Errors are categorized by where they stop mattering:
//! - **Startup**: configuration and initialization failures end the process
//! - **Fetch**: logged per request, the worker keeps going
//! - **Persistence**: logged per flush, the scrape keeps going

mod types;

// Re-export public API
pub use types::{ConfigError, DatabaseError, ExportError, FetchError, InitializationError};
