//! Query History - bounded, persisted history of translation queries
//!
//! This library keeps the most recent queries a translation app has run and
//! lets you browse, re-run and export them. It provides:
//!
//! - A [`HistoryStore`] capped at 200 entries, most recent first, saved as a
//!   single JSON snapshot after every change
//! - A [`WindowRegistry`] that keeps at most one live window per logical id
//! - [`ViewSync`], which keeps a list/detail pair in step with the store
//! - JSON and CSV export through [`export_history`]
//! - A terminal browser (`query-history browse`) built on the pieces above
//!
//! # Example
//!
//! ```no_run
//! use query_history::{FileSnapshot, HistoryStore};
//! use std::path::Path;
//!
//! let mut store = HistoryStore::open(FileSnapshot::new(Path::new("/tmp/query-history")));
//! store.save("good morning", "buenos días", "en", "es", Some("google"));
//! println!("{} entries", store.len());
//! ```

pub mod cli;
pub mod clipboard;
pub mod engine;
pub mod export;
pub mod models;
pub mod store;
pub mod tui;
pub mod utils;
pub mod view;
pub mod window;

// Re-export commonly used types
pub use export::{ExportError, ExportFormat, export_history};
pub use models::HistoryEntry;
pub use store::{FileSnapshot, HistoryChange, HistoryStore, MemorySnapshot, SnapshotStore};
pub use utils::paths::format_path_with_tilde;
pub use view::{DisplayRow, ViewSync};
pub use window::{WindowHost, WindowRegistry, WindowSpec};
