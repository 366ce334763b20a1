//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use query_history::store::HISTORY_KEY;
use tempfile::TempDir;

/// Builder for a data directory with an optional pre-written snapshot
pub struct DataDirBuilder {
    temp_dir: TempDir,
}

impl DataDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write raw snapshot content
    pub fn with_snapshot(self, content: &str) -> Self {
        fs::write(snapshot_path(self.temp_dir.path()), content)
            .expect("Failed to write snapshot");
        self
    }

    /// Write a snapshot made of the given entries, in order
    pub fn with_entries(self, entries: &[EntryBuilder]) -> Self {
        let content = format!(
            "[{}]",
            entries.iter().map(|e| e.to_json()).collect::<Vec<_>>().join(",")
        );
        self.with_snapshot(&content)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

/// Where the file-backed store keeps its snapshot inside `dir`
pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", HISTORY_KEY))
}

/// Builder for snapshot entries as persisted on disk
pub struct EntryBuilder {
    id: String,
    text: String,
    result: String,
    from: String,
    to: String,
    service: Option<String>,
    date: serde_json::Value,
}

impl EntryBuilder {
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            result: format!("{} (translated)", text),
            from: "en".to_string(),
            to: "fr".to_string(),
            service: None,
            date: serde_json::json!("2025-11-02T09:41:20.016Z"),
        }
    }

    pub fn result(mut self, result: &str) -> Self {
        self.result = result.to_string();
        self
    }

    pub fn service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    /// Date as epoch milliseconds instead of an RFC3339 string
    pub fn epoch_millis(mut self, millis: i64) -> Self {
        self.date = serde_json::json!(millis);
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "id": self.id,
            "text": self.text,
            "result": self.result,
            "from": self.from,
            "to": self.to,
            "service": self.service,
            "date": self.date,
        })
        .to_string()
    }
}

/// Parse exported CSV with the `csv` crate: (header, data records)
pub fn read_csv(input: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input.as_bytes());
    let header = reader
        .headers()
        .expect("Failed to read CSV header")
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|record| record.expect("Malformed CSV record").iter().map(str::to_string).collect())
        .collect();
    (header, records)
}
