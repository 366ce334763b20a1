//! List/detail synchronization for the history window.
//!
//! [`ViewSync`] projects store entries into [`DisplayRow`]s, keeps the
//! selection keyed by entry id, and pushes the selected query into a
//! [`DetailSurface`] whenever the selection changes.
//!
//! Selection fallback: after every reload a non-empty row list has a valid
//! selection. A selection whose entry disappeared moves to the first row;
//! an empty list clears it.

pub mod detail;
pub mod timestamps;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};

pub use detail::{DetailState, LiveQueryDetail};
pub use timestamps::format_timestamp;

use crate::clipboard::{ClipboardProvider, copy_with_provider};
use crate::engine::QueryRequest;
use crate::models::HistoryEntry;
use crate::store::HistoryStore;

/// Presentation row derived from a [`HistoryEntry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: String,
    pub time: DateTime<Utc>,
    pub time_string: String,
    /// Empty when the entry has no service
    pub service: String,
    pub from: String,
    pub to: String,
    pub query: String,
    pub translated: String,
}

impl DisplayRow {
    pub fn from_entry(entry: &HistoryEntry, now: &DateTime<Utc>) -> Self {
        Self {
            id: entry.id.clone(),
            time: entry.timestamp,
            time_string: timestamps::format_timestamp_at(&entry.timestamp, now),
            service: entry.service.clone().unwrap_or_default(),
            from: entry.source_language.clone(),
            to: entry.target_language.clone(),
            query: entry.query_text.clone(),
            translated: entry.result_text.clone(),
        }
    }

    fn query_request(&self) -> QueryRequest {
        QueryRequest::new(self.query.as_str(), self.from.as_str(), self.to.as_str())
    }
}

/// The pane bound to the current selection
pub trait DetailSurface {
    /// Set the query the pane should answer
    fn load_query(&mut self, request: QueryRequest);

    /// Run the loaded query again
    fn retry_query(&mut self);

    /// Nothing is selected any more
    fn clear(&mut self) {}
}

pub struct ViewSync<D: DetailSurface> {
    rows: Vec<DisplayRow>,
    selected_id: Option<String>,
    detail: D,
}

impl<D: DetailSurface> ViewSync<D> {
    pub fn new(detail: D) -> Self {
        Self { rows: Vec::new(), selected_id: None, detail }
    }

    /// Rebuild rows from the store and re-apply selection fallback
    pub fn reload(&mut self, store: &HistoryStore) {
        self.reload_at(store, &Utc::now());
    }

    pub(crate) fn reload_at(&mut self, store: &HistoryStore, now: &DateTime<Utc>) {
        self.rows =
            store.all_items().iter().map(|entry| DisplayRow::from_entry(entry, now)).collect();

        let still_present = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.rows.iter().any(|row| row.id == id));

        if !still_present {
            let fallback = self.rows.first().map(|row| row.id.clone());
            self.set_selection(fallback);
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.selected_index().map(|index| &self.rows[index])
    }

    /// Select the row with `id`. Returns false if there is no such row.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.rows.iter().any(|row| row.id == id) {
            return false;
        }
        self.set_selection(Some(id.to_string()));
        true
    }

    /// Move the selection by `delta` rows, clamped to the list
    pub fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.selected_index().unwrap_or(0) as isize;
        let target = (current + delta).clamp(0, self.rows.len() as isize - 1) as usize;
        let id = self.rows[target].id.clone();
        self.set_selection(Some(id));
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    /// Re-run the selected query in the detail pane
    pub fn refresh_detail(&mut self) {
        if self.selected_row().is_some() {
            self.detail.retry_query();
        }
    }

    pub fn copy_query(&self, id: &str, clipboard: &mut dyn ClipboardProvider) -> Result<()> {
        let Some(row) = self.row(id) else {
            bail!("No history entry with id {}", id);
        };
        copy_with_provider(&row.query, clipboard)
    }

    pub fn copy_result(&self, id: &str, clipboard: &mut dyn ClipboardProvider) -> Result<()> {
        let Some(row) = self.row(id) else {
            bail!("No history entry with id {}", id);
        };
        if row.translated.is_empty() {
            bail!("Entry has no result text to copy");
        }
        copy_with_provider(&row.translated, clipboard)
    }

    /// Delete the entry behind a row, then reload
    pub fn delete_row(&mut self, id: &str, store: &mut HistoryStore) {
        store.delete(id);
        self.reload(store);
    }

    /// Clear the whole history, then reload
    pub fn clear_all(&mut self, store: &mut HistoryStore) {
        store.clear();
        self.reload(store);
    }

    pub fn detail(&self) -> &D {
        &self.detail
    }

    fn row(&self, id: &str) -> Option<&DisplayRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    fn set_selection(&mut self, id: Option<String>) {
        if self.selected_id == id {
            return;
        }
        self.selected_id = id;

        match self.selected_row().map(DisplayRow::query_request) {
            Some(request) => {
                self.detail.load_query(request);
                self.detail.retry_query();
            }
            None => self.detail.clear(),
        }
    }
}
