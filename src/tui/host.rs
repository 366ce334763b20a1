use ratatui::layout::Rect;

use crate::window::{WindowHost, WindowSpec};

/// Rough size of one terminal cell in logical pixels
const CELL_WIDTH_PX: u32 = 8;
const CELL_HEIGHT_PX: u32 = 16;

/// What a pane renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneContent {
    History,
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u64);

/// A live terminal window
#[derive(Debug, Clone)]
pub struct Pane {
    pub id: PaneId,
    pub window_id: String,
    pub spec: WindowSpec,
    pub content: PaneContent,
}

/// Window host that stacks panes on the terminal screen.
///
/// The most recently opened pane is on top and receives input.
#[derive(Debug, Default)]
pub struct PaneHost {
    panes: Vec<Pane>,
    next_id: u64,
}

impl PaneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live panes, bottom to top
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn top(&self) -> Option<&Pane> {
        self.panes.last()
    }
}

impl WindowHost for PaneHost {
    type Handle = PaneId;
    type Content = PaneContent;

    // The browser already owns the terminal
    fn activate(&mut self) {}

    fn open(&mut self, window_id: &str, spec: &WindowSpec, content: PaneContent) -> PaneId {
        self.next_id += 1;
        let id = PaneId(self.next_id);
        self.panes.push(Pane { id, window_id: window_id.to_string(), spec: spec.clone(), content });
        id
    }

    fn close(&mut self, handle: PaneId) {
        self.panes.retain(|pane| pane.id != handle);
    }
}

/// Screen rectangle for a pane, centered in `area`.
///
/// Resizable panes take the whole area (they are at least their requested
/// size, and grow with the terminal). Fixed panes keep their requested size
/// converted to cells, shrunk only when the terminal is smaller.
pub fn pane_rect(spec: &WindowSpec, area: Rect) -> Rect {
    if spec.resizable || area.width == 0 || area.height == 0 {
        return area;
    }

    let cols = (spec.width / CELL_WIDTH_PX).clamp(1, u32::from(area.width)) as u16;
    let rows = (spec.height / CELL_HEIGHT_PX).clamp(1, u32::from(area.height)) as u16;

    Rect {
        x: area.x + (area.width - cols) / 2,
        y: area.y + (area.height - rows) / 2,
        width: cols,
        height: rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close_panes() {
        let mut host = PaneHost::new();
        let a = host.open("a", &WindowSpec::history(), PaneContent::History);
        let b = host.open("b", &WindowSpec::about(), PaneContent::About);

        assert_eq!(host.top().map(|p| p.id), Some(b));

        host.close(b);
        assert_eq!(host.top().map(|p| p.id), Some(a));
        assert_eq!(host.panes().len(), 1);
    }

    #[test]
    fn test_resizable_pane_fills_area() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(pane_rect(&WindowSpec::history(), area), area);
    }

    #[test]
    fn test_fixed_pane_is_centered() {
        let area = Rect::new(0, 0, 100, 30);
        let rect = pane_rect(&WindowSpec::about(), area);

        assert_eq!((rect.width, rect.height), (75, 13));
        assert_eq!((rect.x, rect.y), (12, 8));
    }

    #[test]
    fn test_fixed_pane_shrinks_to_small_terminal() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = pane_rect(&WindowSpec::about(), area);

        assert_eq!(rect, area);
    }

    #[test]
    fn test_tiny_and_empty_areas() {
        let one = Rect::new(0, 0, 1, 1);
        assert_eq!(pane_rect(&WindowSpec::about(), one), one);

        let empty = Rect::new(3, 3, 0, 0);
        assert_eq!(pane_rect(&WindowSpec::about(), empty), empty);
    }
}
