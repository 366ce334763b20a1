//! Window sessions keyed by logical id.
//!
//! [`WindowRegistry`] is a table from window id to the handle of the live
//! window for that id. All window creation goes through
//! [`WindowRegistry::show_window`], which closes any existing window for the
//! id before opening the new one, so at most one window per id is ever live.
//!
//! The surfaces themselves come from a [`WindowHost`]: the terminal browser
//! stacks panes, tests record calls.

use std::collections::HashMap;

use tracing::debug;

/// History list/detail window
pub const HISTORY_WINDOW: &str = "history_window";
/// About window
pub const ABOUT_WINDOW: &str = "about_window";

/// Requested window geometry and chrome, in logical pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl WindowSpec {
    /// Resizable, untitled window of at least `width` x `height`
    pub fn new(width: u32, height: u32) -> Self {
        Self { title: String::new(), width, height, resizable: true }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// The history window: 1000x800, resizable
    pub fn history() -> Self {
        Self::new(1000, 800).title("Query History")
    }

    /// The about window: 600x220, fixed size
    pub fn about() -> Self {
        Self::new(600, 220).title("About").resizable(false)
    }
}

/// Creates and destroys window surfaces
pub trait WindowHost {
    type Handle;
    type Content;

    /// Bring the application to the front
    fn activate(&mut self);

    /// Build, center and show a window for `spec` rendering `content`.
    /// The window is at least `spec.width` x `spec.height`.
    fn open(&mut self, window_id: &str, spec: &WindowSpec, content: Self::Content) -> Self::Handle;

    fn close(&mut self, handle: Self::Handle);
}

pub struct WindowRegistry<H: WindowHost> {
    host: H,
    sessions: HashMap<String, H::Handle>,
}

impl<H: WindowHost> WindowRegistry<H> {
    pub fn new(host: H) -> Self {
        Self { host, sessions: HashMap::new() }
    }

    /// Show the window for `window_id`, replacing any live one.
    ///
    /// An empty title falls back to the window id.
    pub fn show_window(
        &mut self,
        window_id: &str,
        mut spec: WindowSpec,
        content: impl FnOnce() -> H::Content,
    ) {
        self.host.activate();
        self.close_window(window_id);

        if spec.title.is_empty() {
            spec.title = window_id.to_string();
        }

        let handle = self.host.open(window_id, &spec, content());
        self.sessions.insert(window_id.to_string(), handle);
        debug!(window_id, width = spec.width, height = spec.height, "window shown");
    }

    /// Close the window for `window_id` if one is live.
    ///
    /// Returns whether a window was closed.
    pub fn close_window(&mut self, window_id: &str) -> bool {
        match self.sessions.remove(window_id) {
            Some(handle) => {
                self.host.close(handle);
                debug!(window_id, "window closed");
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self, window_id: &str) -> bool {
        self.sessions.contains_key(window_id)
    }

    pub fn handle(&self, window_id: &str) -> Option<&H::Handle> {
        self.sessions.get(window_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of live windows, sorted
    pub fn window_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
