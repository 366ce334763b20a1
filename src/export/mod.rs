//! Export the full history to JSON or CSV.
//!
//! The pipeline is: ask a [`SaveLocationChooser`] for a destination, render
//! the whole snapshot in memory, then write it atomically. Cancelling the
//! chooser is not an error and returns `Ok(None)`. A failed export never
//! leaves a partial file behind.

pub mod csv;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::HistoryEntry;
use crate::models::deserializers::format_rfc3339;
use crate::store::HistoryStore;
use crate::utils::write_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not encode history as {format}: {message}")]
    Serialize { format: &'static str, message: String },
    #[error("could not write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
    #[error("could not choose a save location: {0}")]
    Chooser(String),
}

/// Picks where an export goes. `Ok(None)` means the user cancelled.
pub trait SaveLocationChooser {
    fn choose(
        &mut self,
        suggested_name: &str,
        format: ExportFormat,
    ) -> anyhow::Result<Option<PathBuf>>;
}

/// A location decided up front; `None` behaves like a cancelled dialog
#[derive(Debug, Clone, Default)]
pub struct FixedLocation(pub Option<PathBuf>);

impl FixedLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    pub fn cancelled() -> Self {
        Self(None)
    }
}

impl SaveLocationChooser for FixedLocation {
    fn choose(&mut self, _: &str, _: ExportFormat) -> anyhow::Result<Option<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Uses the suggested file name inside a directory
#[derive(Debug, Clone)]
pub struct SuggestedNameIn(pub PathBuf);

impl SaveLocationChooser for SuggestedNameIn {
    fn choose(&mut self, suggested_name: &str, _: ExportFormat) -> anyhow::Result<Option<PathBuf>> {
        Ok(Some(self.0.join(suggested_name)))
    }
}

/// One exported row; the same field set for JSON and CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub result: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    pub service: Option<&'a str>,
    pub date: String,
}

impl<'a> From<&'a HistoryEntry> for ExportRecord<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            id: &entry.id,
            text: &entry.query_text,
            result: &entry.result_text,
            from: &entry.source_language,
            to: &entry.target_language,
            service: entry.service.as_deref(),
            date: format_rfc3339(&entry.timestamp),
        }
    }
}

impl ExportRecord<'_> {
    /// Fields in header order; a missing service is an empty field
    pub fn fields(&self) -> [&str; 7] {
        let service = self.service.unwrap_or("");
        [self.id, self.text, self.result, self.from, self.to, service, &self.date]
    }
}

/// `QueryHistory_<epoch seconds>.<ext>`
pub fn suggested_file_name(format: ExportFormat, now: &DateTime<Utc>) -> String {
    format!("QueryHistory_{}.{}", now.timestamp(), format.extension())
}

/// Render `entries` in `format` without touching the filesystem
pub fn render(entries: &[HistoryEntry], format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let records: Vec<ExportRecord<'_>> = entries.iter().map(ExportRecord::from).collect();
    match format {
        ExportFormat::Json => serde_json::to_vec_pretty(&records)
            .map_err(|e| ExportError::Serialize { format: format.label(), message: e.to_string() }),
        ExportFormat::Csv => Ok(csv::to_csv(&records).into_bytes()),
    }
}

/// Export the store's current snapshot.
///
/// Returns the destination on success and `None` if the chooser was
/// cancelled.
pub fn export_history(
    store: &HistoryStore,
    format: ExportFormat,
    chooser: &mut dyn SaveLocationChooser,
) -> Result<Option<PathBuf>, ExportError> {
    let suggested = suggested_file_name(format, &Utc::now());
    let destination = chooser
        .choose(&suggested, format)
        .map_err(|e| ExportError::Chooser(format!("{:#}", e)))?;

    let Some(path) = destination else {
        info!(format = format.label(), "export cancelled");
        return Ok(None);
    };

    let entries = store.all_items();
    let bytes = render(&entries, format)?;
    write_file(&path, &bytes)?;

    info!(
        format = format.label(),
        count = entries.len(),
        path = %path.display(),
        "exported history"
    );
    Ok(Some(path))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    write_atomic(path, bytes)
        .map_err(|e| ExportError::Write { path: path.to_path_buf(), message: format!("{:#}", e) })
}
