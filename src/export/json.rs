//! JSON export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error_handling::ExportError;
use crate::models::ScrapedRecord;

/// Writes `records` to `path` as a pretty-printed JSON array.
///
/// Two-space indentation, trailing newline, any existing file is replaced.
/// An empty slice produces `[]`.
pub fn export_json(records: &[ScrapedRecord], path: &Path) -> Result<(), ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_json_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        export_json(&[ScrapedRecord::new("Hello", "/h")], &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[\n  {\n    \"title\": \"Hello\",\n    \"link\": \"/h\"\n  }\n]\n"
        );
    }

    #[test]
    fn test_export_json_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        export_json(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_export_json_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        export_json(
            &[ScrapedRecord::new("a", "1"), ScrapedRecord::new("b", "2")],
            &path,
        )
        .unwrap();
        export_json(&[ScrapedRecord::new("c", "3")], &path).unwrap();

        let parsed: Vec<ScrapedRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec![ScrapedRecord::new("c", "3")]);
    }

    #[test]
    fn test_export_json_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("output.json");
        let err = export_json(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(err.to_string().contains("output.json"));
    }
}
