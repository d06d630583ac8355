//! Export functionality for scraped records.
//!
//! File encoders (JSON, CSV) and the `Flusher` that writes the result store
//! to every configured output.

mod csv;
mod flush;
mod json;

pub use csv::export_csv;
pub use flush::{FlushSummary, Flusher, OutputPaths};
pub use json::export_json;
