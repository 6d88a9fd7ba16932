//! Gzip-compressed tab-separated output
//!
//! Writes are synchronous `std::fs` calls made directly from the async dump
//! loops, one row per call.

use crate::errors::{ExportError, ExportResult};
use csv::{Terminator, WriterBuilder};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::path::{Path, PathBuf};
use testbed_influx::Row;

/// Writes rows under a fixed header, tab-delimited with CRLF line endings
///
/// Header columns missing from a row are written empty; row columns not in
/// the header are dropped.
pub struct TsvWriter {
    path: PathBuf,
    columns: Vec<String>,
    writer: csv::Writer<GzEncoder<File>>,
    rows: usize,
}

impl TsvWriter {
    /// Create (or truncate) `path` and write the header line
    pub fn create<S: AsRef<str>>(path: &Path, columns: &[S]) -> ExportResult<Self> {
        let file = File::create(path).map_err(|e| ExportError::io(path, "create", e))?;
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::CRLF)
            .from_writer(GzEncoder::new(file, Compression::default()));

        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        writer.write_record(&columns)?;

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            writer,
            rows: 0,
        })
    }

    pub fn write_row(&mut self, row: &Row) -> ExportResult<()> {
        let record = self
            .columns
            .iter()
            .map(|column| row.get(column).map(render_value).unwrap_or_default());
        self.writer.write_record(record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and close the gzip stream, returning the number of data rows
    pub fn finish(self) -> ExportResult<usize> {
        let path = self.path;
        let encoder = self
            .writer
            .into_inner()
            .map_err(|e| ExportError::io(&path, "flush", e.into_error()))?;
        encoder
            .finish()
            .map_err(|e| ExportError::io(&path, "compress", e))?;
        Ok(self.rows)
    }
}

/// Text of one cell: null is empty, strings are written unquoted
pub fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
