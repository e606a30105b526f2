//! CSV report of downloaded recordings.
//!
//! One row per successfully downloaded file, appended in discovery order.
//! The writer enforces no uniqueness; the orchestrator's existence check is
//! what keeps re-runs from producing duplicate rows.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const REPORT_HEADER: [&str; 4] = ["File Name", "Recording Date", "Local Path", "Size (MB)"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "File Name")]
    pub file_name: String,
    #[serde(rename = "Recording Date")]
    pub recording_date: String,
    #[serde(rename = "Local Path")]
    pub local_path: String,
    #[serde(rename = "Size (MB)")]
    pub size_mb: f64,
}

/// Handle to the report file. Each append is an independent open-write-flush
/// cycle, so the file survives across process invocations but is not safe
/// for concurrent writers.
pub struct Report {
    path: PathBuf,
}

impl Report {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the report with its header row if it does not exist yet.
    pub fn ensure(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create report directory")?;
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create report {}", self.path.display()))?;
        writer.write_record(REPORT_HEADER)?;
        writer.flush().context("Failed to write report header")?;
        Ok(())
    }

    /// Append a single row, creating the report first if needed.
    ///
    /// The size is written with two decimal places.
    pub fn append(&self, row: &ReportRow) -> Result<()> {
        self.ensure()?;
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open report {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let size = format!("{:.2}", row.size_mb);
        writer.write_record([
            row.file_name.as_str(),
            row.recording_date.as_str(),
            row.local_path.as_str(),
            size.as_str(),
        ])?;
        writer.flush().context("Failed to append report row")?;
        Ok(())
    }

    /// Read every row back in append order.
    pub fn read_rows(&self) -> Result<Vec<ReportRow>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open report {}", self.path.display()))?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            rows.push(record.context("Failed to parse report row")?);
        }
        Ok(rows)
    }
}
