//! CSV export.
//!
//! Header `Title,Link`, then one row per record in store order. Fields with
//! commas, quotes, or newlines are quoted by the `csv` writer.

use std::fs::File;
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::config::CSV_HEADER;
use crate::error_handling::ExportError;
use crate::models::ScrapedRecord;

/// Writes `records` to `path` as CSV, replacing any existing file.
pub fn export_csv(records: &[ScrapedRecord], path: &Path) -> Result<(), ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([record.title.as_str(), record.link.as_str()])?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}
