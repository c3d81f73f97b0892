use crate::models::{ListingRecord, COLUMNS};
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

/// Append-mode CSV sink for listing records
///
/// Rows are flushed one by one, so an interrupted run keeps everything that
/// was already appended. The header is written only when the destination is
/// new or empty; reruns keep appending below the existing rows.
pub struct CsvAppender {
    writer: csv::Writer<File>,
}

impl CsvAppender {
    /// Open `path` for appending, writing the header row first if the file
    /// is new or empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if size == 0 {
            writer.write_record(COLUMNS).context("Failed to write CSV header")?;
            writer.flush().context("Failed to flush CSV header")?;
            debug!("Wrote CSV header to {}", path.display());
        }

        Ok(Self { writer })
    }

    /// Append one record and flush it to disk.
    pub fn append(&mut self, record: &ListingRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .context("Failed to write CSV row")?;
        self.writer.flush().context("Failed to flush CSV row")?;
        debug!("Appended row for {}", record.url);
        Ok(())
    }
}
