//! Durable snapshot backends
//!
//! A snapshot is a single key-value record holding the whole history as a
//! JSON array. It is read once when the store opens and rewritten in full on
//! every mutation; there is no append format.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};

use crate::utils::{validate_file_size, write_atomic};

/// Key of the history record
pub const HISTORY_KEY: &str = "query_history_items";

/// Storage for the serialized history record
pub trait SnapshotStore {
    /// Returns `Ok(None)` when nothing has been persisted yet
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored record
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Snapshot kept as `<dir>/query_history_items.json`
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(dir: &Path) -> Self {
        Self { path: dir.join(format!("{}.json", HISTORY_KEY)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshot {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open snapshot: {}", self.path.display()))?;
        validate_file_size(&file, &self.path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;
        Ok(Some(bytes))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        write_atomic(&self.path, bytes)
    }
}

/// In-memory snapshot for tests and benches.
///
/// Clones share the same record, so a second store opened from a clone sees
/// exactly what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    inner: Rc<RefCell<MemoryRecord>>,
}

#[derive(Debug, Default)]
struct MemoryRecord {
    bytes: Option<Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw bytes, valid or not
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let snapshot = Self::default();
        snapshot.inner.borrow_mut().bytes = Some(bytes.into());
        snapshot
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.inner.borrow().bytes.clone()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl SnapshotStore for MemorySnapshot {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut record = self.inner.borrow_mut();
        if record.fail_writes {
            bail!("snapshot storage unavailable");
        }
        record.bytes = Some(bytes.to_vec());
        record.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_snapshot_missing_reads_none() {
        let dir = TempDir::new().unwrap();
        let snapshot = FileSnapshot::new(dir.path());
        assert!(snapshot.read().unwrap().is_none());
    }

    #[test]
    fn test_file_snapshot_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("data");
        let mut snapshot = FileSnapshot::new(&nested);

        snapshot.write(b"[]").unwrap();

        assert_eq!(snapshot.read().unwrap().as_deref(), Some(&b"[]"[..]));
        assert!(snapshot.path().ends_with("query_history_items.json"));
    }

    #[test]
    fn test_memory_snapshot_clones_share_record() {
        let snapshot = MemorySnapshot::new();
        let mut writer = snapshot.clone();

        writer.write(b"[1]").unwrap();

        assert_eq!(snapshot.bytes().as_deref(), Some(&b"[1]"[..]));
        assert_eq!(snapshot.write_count(), 1);
    }

    #[test]
    fn test_memory_snapshot_failing_writes_keep_old_bytes() {
        let mut snapshot = MemorySnapshot::with_bytes("[]");
        snapshot.set_fail_writes(true);

        assert!(snapshot.write(b"[1]").is_err());
        assert_eq!(snapshot.bytes().as_deref(), Some(&b"[]"[..]));
        assert_eq!(snapshot.write_count(), 0);
    }
}
