use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen split: window area plus status bar
pub struct AppLayout {
    pub window_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Windows (at least 3 rows)
                Constraint::Length(1), // Status bar (1 row)
            ])
            .split(area);

        Self { window_area: chunks[0], status_area: chunks[1] }
    }
}

/// Inside the history window:
/// - Entry list: 35% width (left)
/// - Live detail: 65% width (right)
pub struct HistoryLayout {
    pub list_area: Rect,
    pub detail_area: Rect,
}

impl HistoryLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        Self { list_area: chunks[0], detail_area: chunks[1] }
    }
}

/// One-line prompt docked at the bottom of `area`, inset by a cell
pub fn prompt_area(area: Rect) -> Rect {
    let height = 3.min(area.height);
    Rect {
        x: area.x + 1.min(area.width),
        y: area.y + area.height - height,
        width: area.width.saturating_sub(2),
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_correctly() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::new(area);

        // Status bar should be 1 row at bottom
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 29);
        assert_eq!(layout.window_area.height, 29);

        let history = HistoryLayout::new(layout.window_area);
        assert_eq!(history.list_area.width, 35);
        assert_eq!(history.detail_area.width, 65);
        assert_eq!(history.detail_area.height, 29);
    }

    #[test]
    fn test_layout_minimum_height() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 4));

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.window_area.height, 3);
    }

    #[test]
    fn test_prompt_area_docks_at_bottom() {
        let rect = prompt_area(Rect::new(0, 0, 100, 29));
        assert_eq!(rect, Rect::new(1, 26, 98, 3));

        let tiny = prompt_area(Rect::new(0, 0, 1, 2));
        assert_eq!(tiny.height, 2);
        assert_eq!(tiny.width, 0);
    }
}
