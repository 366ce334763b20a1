//! Interactive history browser.
//!
//! Windows are panes stacked on the terminal screen. The history pane lists
//! entries on the left and re-runs the selected query on the right.
mod app;
mod events;
pub mod host;
mod layout;
mod rendering;
mod terminal;

use std::path::PathBuf;

use anyhow::Result;
pub use app::App;
pub use host::{PaneContent, PaneHost};
use terminal::TerminalManager;

use crate::clipboard::SystemClipboard;
use crate::engine::QueryEngine;
use crate::store::HistoryStore;

/// Run the interactive TUI until the user quits
pub fn run_interactive(
    store: HistoryStore,
    engine: Box<dyn QueryEngine>,
    export_dir: PathBuf,
) -> Result<()> {
    let mut manager = TerminalManager::new()?;
    let mut app = App::new(store, engine, Box::new(SystemClipboard::new()), export_dir);

    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    res
}
