//! Catalog export as JSON or JSON Lines.

use std::io::Write;

use crate::error::Result;
use crate::types::PhotoRecord;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl ExportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Counts gathered while exporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub records: usize,
    /// Rows recorded for photos that could not be opened
    pub unreadable: usize,
    pub marked_for_deletion: usize,
    pub do_not_delete: usize,
}

impl ExportSummary {
    fn count(&mut self, record: &PhotoRecord) {
        self.records += 1;
        self.unreadable += usize::from(record.is_unreadable_placeholder());
        self.marked_for_deletion += usize::from(record.marked_for_deletion);
        self.do_not_delete += usize::from(record.do_not_delete);
    }
}

/// Serializes catalog records to a writer.
pub struct RecordExporter<W: Write> {
    writer: W,
    format: ExportFormat,
    pretty: bool,
}

impl<W: Write> RecordExporter<W> {
    /// `pretty` only affects [`ExportFormat::Json`].
    pub fn new(writer: W, format: ExportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write every record and flush.
    pub fn export(&mut self, records: &[PhotoRecord]) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();
        match self.format {
            ExportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, records)?;
                } else {
                    serde_json::to_writer(&mut self.writer, records)?;
                }
                writeln!(self.writer)?;
                records.iter().for_each(|r| summary.count(r));
            }
            ExportFormat::JsonLines => {
                for record in records {
                    serde_json::to_writer(&mut self.writer, record)?;
                    writeln!(self.writer)?;
                    summary.count(record);
                }
            }
        }
        self.writer.flush()?;
        Ok(summary)
    }

    /// Consume the exporter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
