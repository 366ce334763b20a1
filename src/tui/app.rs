//! TUI application state and event handling.
//!
//! [`App`] is the composition root of the interactive browser. It owns:
//!
//! - **The store**: every mutation goes through [`HistoryStore`], and the
//!   app listens on a change receiver so the list never goes stale
//! - **Windows**: a [`WindowRegistry`] over the terminal [`PaneHost`], so
//!   reopening a window replaces the old one
//! - **List/detail sync**: a [`ViewSync`] driving the live query pane
//! - **Export prompt**: a one-line path editor standing in for a save dialog
//! - **Status messages**: transient feedback for copy, delete and export

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::debug;

use super::events::{Action, InputMode, poll_event};
use super::host::{PaneContent, PaneHost};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::ClipboardProvider;
use crate::engine::QueryEngine;
use crate::export::{ExportFormat, FixedLocation, export_history, suggested_file_name};
use crate::store::{HistoryChange, HistoryStore};
use crate::utils::{expand_tilde, format_path_with_tilde};
use crate::view::{LiveQueryDetail, ViewSync};
use crate::window::{ABOUT_WINDOW, HISTORY_WINDOW, WindowRegistry, WindowSpec};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Rows moved by PageUp/PageDown
const PAGE_SIZE: isize = 10;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Export destination being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPrompt {
    pub format: ExportFormat,
    pub input: String,
}

pub struct App {
    store: HistoryStore,
    changes: Receiver<HistoryChange>,
    windows: WindowRegistry<PaneHost>,
    view: ViewSync<LiveQueryDetail>,
    clipboard: Box<dyn ClipboardProvider>,
    /// Directory the export prompt suggests
    export_dir: PathBuf,
    prompt: Option<ExportPrompt>,
    should_quit: bool,
    // Status message (clipboard feedback, etc.)
    status_message: Option<StatusMessage>,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    /// Build the app and open the history window
    pub fn new(
        mut store: HistoryStore,
        engine: Box<dyn QueryEngine>,
        clipboard: Box<dyn ClipboardProvider>,
        export_dir: PathBuf,
    ) -> Self {
        let changes = store.subscribe();

        let mut app = Self {
            store,
            changes,
            windows: WindowRegistry::new(PaneHost::new()),
            view: ViewSync::new(LiveQueryDetail::new(engine)),
            clipboard,
            export_dir,
            prompt: None,
            should_quit: false,
            status_message: None,
            needs_redraw: true, // Initial draw needed
            last_draw_time: Instant::now(),
        };
        app.show_history();
        app
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn set_success(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear =
            self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// Reload rows if the store reported changes. Returns whether it did.
    fn drain_changes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(change) = self.changes.try_recv() {
            debug!(?change, "history changed");
            changed = true;
        }
        if changed {
            self.view.reload(&self.store);
            self.needs_redraw = true;
        }
        changed
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();
            self.drain_changes();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| {
                    let state = RenderState {
                        panes: self.windows.host().panes(),
                        rows: self.view.rows(),
                        selected_idx: self.view.selected_index(),
                        detail: self.view.detail(),
                        status_message: self.status_message.as_ref(),
                        prompt: self.prompt.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.input_mode())?;
            self.handle_action(action);
        }

        Ok(())
    }

    fn input_mode(&self) -> InputMode {
        if self.prompt.is_some() { InputMode::Prompt } else { InputMode::Browse }
    }

    /// True when the history window is the top pane
    fn history_focused(&self) -> bool {
        self.windows.host().top().is_some_and(|pane| pane.content == PaneContent::History)
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::CloseWindow => self.close_top_window(),
            Action::ShowHistory => self.show_history(),
            Action::ShowAbout => self.show_about(),

            Action::PromptInput(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.push(c);
                    self.needs_redraw = true;
                }
            }
            Action::PromptBackspace => {
                if let Some(prompt) = self.prompt.as_mut()
                    && prompt.input.pop().is_some()
                {
                    self.needs_redraw = true;
                }
            }
            Action::PromptConfirm => self.confirm_export(),
            Action::PromptCancel => {
                if self.prompt.take().is_some() {
                    debug!("export cancelled");
                    self.needs_redraw = true;
                }
            }

            Action::None => {}

            // Everything below acts on the history list
            _ if !self.history_focused() => {}
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE_SIZE),
            Action::PageDown => self.move_selection(PAGE_SIZE),
            Action::CopyQuery => self.copy_selected(false),
            Action::CopyResult => self.copy_selected(true),
            Action::DeleteSelected => self.delete_selected(),
            Action::ClearAll => self.clear_all(),
            Action::Export(format) => self.begin_export(format),
            Action::RetryQuery => {
                self.view.refresh_detail();
                self.needs_redraw = true;
            }
        }
    }

    fn show_history(&mut self) {
        self.windows.show_window(HISTORY_WINDOW, WindowSpec::history(), || PaneContent::History);
        self.view.reload(&self.store);
        self.needs_redraw = true;
    }

    fn show_about(&mut self) {
        self.windows.show_window(ABOUT_WINDOW, WindowSpec::about(), || PaneContent::About);
        self.needs_redraw = true;
    }

    /// Close the top window; with nothing open, quit
    fn close_top_window(&mut self) {
        match self.windows.host().top().map(|pane| pane.window_id.clone()) {
            Some(window_id) => {
                self.windows.close_window(&window_id);
                self.needs_redraw = true;
            }
            None => self.should_quit = true,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let old = self.view.selected_index();
        self.view.move_selection(delta);
        if old != self.view.selected_index() {
            self.needs_redraw = true;
        }
    }

    fn copy_selected(&mut self, result: bool) {
        let Some(id) = self.view.selected_id().map(str::to_string) else {
            self.set_error("✗ No entries to copy");
            return;
        };

        let copied = if result {
            self.view.copy_result(&id, self.clipboard.as_mut())
        } else {
            self.view.copy_query(&id, self.clipboard.as_mut())
        };

        match copied {
            Ok(()) => self.set_success("✓ Copied to clipboard"),
            Err(e) => self.set_error(format!("✗ Clipboard error: {}", e)),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.view.selected_id().map(str::to_string) else {
            return;
        };
        self.view.delete_row(&id, &mut self.store);
        self.report_mutation("✓ Deleted entry");
    }

    fn clear_all(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.view.clear_all(&mut self.store);
        self.report_mutation("✓ History cleared");
    }

    /// Status for a mutation, surfacing a failed persist
    fn report_mutation(&mut self, success: &str) {
        match self.store.last_persist_error().map(str::to_string) {
            Some(error) => self.set_error(format!("✗ History not saved: {}", error)),
            None => self.set_success(success),
        }
    }

    fn begin_export(&mut self, format: ExportFormat) {
        if self.store.is_empty() {
            self.set_error("✗ Nothing to export");
            return;
        }

        let suggested = suggested_file_name(format, &chrono::Utc::now());
        let input = self.export_dir.join(suggested).display().to_string();
        self.prompt = Some(ExportPrompt { format, input });
        self.needs_redraw = true;
    }

    fn confirm_export(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        self.needs_redraw = true;

        let input = prompt.input.trim();
        if input.is_empty() {
            self.set_error("✗ Export needs a file name");
            return;
        }

        let mut chooser = FixedLocation::new(expand_tilde(input));
        match export_history(&self.store, prompt.format, &mut chooser) {
            Ok(Some(path)) => self.set_success(format!(
                "✓ Exported {} to {}",
                prompt.format.label(),
                format_path_with_tilde(&path)
            )),
            Ok(None) => {}
            Err(e) => self.set_error(format!("✗ Export failed: {}", e)),
        }
    }
}
