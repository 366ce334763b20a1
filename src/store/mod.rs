//! Bounded, persisted query history
//!
//! [`HistoryStore`] owns the ordered entry collection (most recent first,
//! capped at [`MAX_ITEMS`]) and is the only place it is mutated. Every
//! mutation rewrites the whole snapshot and then notifies subscribers.
//!
//! # Error Handling Strategy
//!
//! History is a convenience, so nothing here fails the caller:
//!
//! - **Blank input**: `save` with a blank query or result is a silent no-op.
//! - **Unreadable snapshot**: logged at `warn`; the store starts empty.
//! - **Persist failure**: logged at `error` and kept in
//!   [`HistoryStore::last_persist_error`]; the in-memory state still changes.

pub mod snapshot;

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

pub use snapshot::{FileSnapshot, HISTORY_KEY, MemorySnapshot, SnapshotStore};

use crate::models::{HistoryEntry, has_content};

/// Retention cap; older entries are evicted past this
pub const MAX_ITEMS: usize = 200;

/// Published after each mutation that changed the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    Saved { id: String },
    Deleted { id: String },
    Cleared,
}

pub struct HistoryStore {
    backend: Box<dyn SnapshotStore>,
    items: Vec<HistoryEntry>,
    subscribers: Vec<Sender<HistoryChange>>,
    last_persist_error: Option<String>,
}

impl HistoryStore {
    /// Open the store, loading whatever the backend holds
    pub fn open(backend: impl SnapshotStore + 'static) -> Self {
        let items = load_items(&backend);
        debug!(count = items.len(), "loaded query history");
        Self {
            backend: Box::new(backend),
            items,
            subscribers: Vec::new(),
            last_persist_error: None,
        }
    }

    /// Record a query. Blank query or result text is ignored.
    ///
    /// Returns the id of the new entry, or `None` when the input was skipped.
    pub fn save(
        &mut self,
        query_text: &str,
        result_text: &str,
        source_language: &str,
        target_language: &str,
        service: Option<&str>,
    ) -> Option<String> {
        if !has_content(query_text) || !has_content(result_text) {
            debug!("skipping history save with blank query or result");
            return None;
        }

        let entry =
            HistoryEntry::new(query_text, result_text, source_language, target_language, service);
        let id = entry.id.clone();
        self.items.insert(0, entry);

        if self.items.len() > MAX_ITEMS {
            let evicted = self.items.len() - MAX_ITEMS;
            self.items.truncate(MAX_ITEMS);
            debug!(evicted, "evicted oldest history entries");
        }

        self.persist();
        self.publish(HistoryChange::Saved { id: id.clone() });
        Some(id)
    }

    /// Snapshot of all entries, most recent first
    pub fn all_items(&self) -> Vec<HistoryEntry> {
        self.items.clone()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.items.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove the entry with `id`. Unknown ids are ignored.
    ///
    /// Returns whether an entry was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.items.iter().position(|entry| entry.id == id) else {
            debug!(id, "delete of unknown history entry ignored");
            return false;
        };

        self.items.remove(index);
        self.persist();
        self.publish(HistoryChange::Deleted { id: id.to_string() });
        true
    }

    pub fn clear(&mut self) {
        let count = self.items.len();
        self.items.clear();
        self.persist();
        self.publish(HistoryChange::Cleared);
        info!(count, "cleared query history");
    }

    /// Receive a [`HistoryChange`] for every later mutation
    pub fn subscribe(&mut self) -> Receiver<HistoryChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Why the most recent persist failed, if it did
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn persist(&mut self) {
        match self.write_snapshot() {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                let message = format!("{:#}", e);
                error!(error = %message, "failed to persist query history");
                self.last_persist_error = Some(message);
            }
        }
    }

    fn write_snapshot(&mut self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.items).context("Failed to serialize history")?;
        self.backend.write(&bytes)
    }

    fn publish(&mut self, change: HistoryChange) {
        // Dropped receivers fall out here
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

fn load_items(backend: &dyn SnapshotStore) -> Vec<HistoryEntry> {
    let bytes = match backend.read() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(error = %message, "failed to read history snapshot, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<HistoryEntry>>(&bytes) {
        Ok(items) => normalize(items),
        Err(e) => {
            warn!(error = %e, "history snapshot is corrupt, starting empty");
            Vec::new()
        }
    }
}

/// Drop entries that break the stored invariants (blank text, repeated id)
/// and enforce the cap.
fn normalize(items: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let total = items.len();
    let mut seen = HashSet::new();
    let mut kept: Vec<HistoryEntry> = items
        .into_iter()
        .filter(|entry| entry.is_valid() && seen.insert(entry.id.clone()))
        .collect();
    kept.truncate(MAX_ITEMS);

    if kept.len() < total {
        warn!(dropped = total - kept.len(), "dropped invalid or excess history entries");
    }
    kept
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn memory_store() -> (HistoryStore, MemorySnapshot) {
        let snapshot = MemorySnapshot::new();
        (HistoryStore::open(snapshot.clone()), snapshot)
    }

    fn stored_entry(id: &str, text: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            query_text: text.to_string(),
            result_text: format!("{} (translated)", text),
            source_language: "en".to_string(),
            target_language: "de".to_string(),
            service: None,
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_save_inserts_at_head() {
        let (mut store, _) = memory_store();

        store.save("one", "eins", "en", "de", None);
        store.save("two", "zwei", "en", "de", Some("google"));

        let items = store.all_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].query_text, "two");
        assert_eq!(items[0].service.as_deref(), Some("google"));
        assert_eq!(items[1].query_text, "one");
    }

    #[test]
    fn test_save_blank_input_is_noop() {
        let (mut store, snapshot) = memory_store();

        for (text, result) in [("", "x"), ("x", ""), ("   ", "x"), ("x", "\n\t "), (" ", " ")] {
            assert!(store.save(text, result, "en", "fr", None).is_none());
        }

        assert!(store.is_empty());
        assert_eq!(snapshot.write_count(), 0);
    }

    #[test]
    fn test_save_keeps_original_text() {
        let (mut store, _) = memory_store();
        store.save("  padded  ", " result\n", "en", "fr", None);

        let item = &store.all_items()[0];
        assert_eq!(item.query_text, "  padded  ");
        assert_eq!(item.result_text, " result\n");
    }

    #[test]
    fn test_retention_cap_evicts_oldest() {
        let (mut store, _) = memory_store();

        for i in 0..(MAX_ITEMS + 1) {
            store.save(&format!("query {}", i), "result", "en", "ja", None);
        }

        let items = store.all_items();
        assert_eq!(items.len(), MAX_ITEMS);
        assert_eq!(items[0].query_text, format!("query {}", MAX_ITEMS));
        assert_eq!(items[MAX_ITEMS - 1].query_text, "query 1");
        assert!(items.iter().all(|e| e.query_text != "query 0"));
    }

    #[test]
    fn test_delete_removes_only_match() {
        let (mut store, _) = memory_store();
        let a = store.save("a", "1", "en", "fr", None).unwrap();
        let b = store.save("b", "2", "en", "fr", None).unwrap();
        let c = store.save("c", "3", "en", "fr", None).unwrap();

        assert!(store.delete(&b));
        let ids: Vec<_> = store.all_items().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c, a]);

        assert!(!store.delete(&b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear_persists_empty_state() {
        let (mut store, snapshot) = memory_store();
        store.save("a", "1", "en", "fr", None);
        store.clear();

        assert!(store.all_items().is_empty());
        assert_eq!(snapshot.bytes().as_deref(), Some(&b"[]"[..]));

        let reopened = HistoryStore::open(snapshot);
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_reopen_roundtrip_is_identical() {
        let (mut store, snapshot) = memory_store();
        for i in 0..5 {
            store.save(&format!("word {}", i), &format!("mot {}", i), "en", "fr", Some("bing"));
        }

        let reopened = HistoryStore::open(snapshot);
        assert_eq!(reopened.all_items(), store.all_items());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let store = HistoryStore::open(MemorySnapshot::with_bytes("{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_drops_invalid_and_duplicate_entries() {
        let mut blank = stored_entry("blank", "x");
        blank.result_text = "  ".to_string();
        let entries = vec![
            stored_entry("a", "first"),
            blank,
            stored_entry("a", "dupe"),
            stored_entry("b", "second"),
        ];
        let bytes = serde_json::to_vec(&entries).unwrap();

        let store = HistoryStore::open(MemorySnapshot::with_bytes(bytes));

        let texts: Vec<_> = store.all_items().into_iter().map(|e| e.query_text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_load_enforces_cap() {
        let entries: Vec<_> =
            (0..MAX_ITEMS + 10).map(|i| stored_entry(&i.to_string(), "word")).collect();
        let bytes = serde_json::to_vec(&entries).unwrap();

        let store = HistoryStore::open(MemorySnapshot::with_bytes(bytes));
        assert_eq!(store.len(), MAX_ITEMS);
        assert_eq!(store.all_items()[0].id, "0");
    }

    #[test]
    fn test_persist_failure_is_swallowed_and_reported() {
        let (mut store, snapshot) = memory_store();
        snapshot.set_fail_writes(true);

        let id = store.save("hello", "hallo", "en", "de", None);
        assert!(id.is_some());
        assert_eq!(store.len(), 1);
        assert!(store.last_persist_error().unwrap().contains("unavailable"));

        snapshot.set_fail_writes(false);
        store.save("bye", "tschüss", "en", "de", None);
        assert!(store.last_persist_error().is_none());
        assert_eq!(HistoryStore::open(snapshot).len(), 2);
    }

    #[test]
    fn test_subscribers_receive_changes() {
        let (mut store, _) = memory_store();
        let rx = store.subscribe();

        let id = store.save("a", "1", "en", "fr", None).unwrap();
        store.delete("missing");
        store.delete(&id);
        store.clear();

        let changes: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                HistoryChange::Saved { id: id.clone() },
                HistoryChange::Deleted { id },
                HistoryChange::Cleared,
            ]
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let (mut store, _) = memory_store();
        drop(store.subscribe());
        let rx = store.subscribe();

        store.save("a", "1", "en", "fr", None);

        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let (mut store, _) = memory_store();
        let id = store.save("a", "1", "en", "fr", None).unwrap();

        assert_eq!(store.get(&id).map(|e| e.query_text.as_str()), Some("a"));
        assert!(store.get("nope").is_none());
    }
}
