use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{ExportPrompt, MessageType, StatusMessage};
use super::host::{Pane, PaneContent, pane_rect};
use super::layout::{AppLayout, HistoryLayout, prompt_area};
use crate::utils::{preview_line, strip_ansi_codes};
use crate::view::{DetailState, DisplayRow, LiveQueryDetail};
use crate::window::WindowSpec;

const BRIGHT: Color = Color::Rgb(250, 250, 250);
const MUTED: Color = Color::Rgb(113, 113, 122);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const RED: Color = Color::Rgb(239, 68, 68);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

/// Everything the UI needs for one frame
pub struct RenderState<'a> {
    /// Bottom to top
    pub panes: &'a [Pane],
    pub rows: &'a [DisplayRow],
    pub selected_idx: Option<usize>,
    pub detail: &'a LiveQueryDetail,
    pub status_message: Option<&'a StatusMessage>,
    pub prompt: Option<&'a ExportPrompt>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    if state.panes.is_empty() {
        render_no_windows(frame, layout.window_area);
    }

    for pane in state.panes {
        let area = pane_rect(&pane.spec, layout.window_area);
        frame.render_widget(Clear, area);
        match pane.content {
            PaneContent::History => render_history(frame, area, &pane.spec, state),
            PaneContent::About => render_about(frame, area, &pane.spec),
        }
    }

    if let Some(prompt) = state.prompt {
        render_prompt(frame, prompt_area(layout.window_area), prompt);
    }

    render_status_bar(frame, layout.status_area, state);
}

fn bordered(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)).title(title)
}

fn render_history(frame: &mut Frame, area: Rect, spec: &WindowSpec, state: &RenderState) {
    let layout = HistoryLayout::new(area);

    let title = format!(" {} ({}) ", spec.title, state.rows.len());
    render_rows_list(frame, layout.list_area, title, state.rows, state.selected_idx);
    render_detail(frame, layout.detail_area, state.detail);
}

fn render_rows_list(
    frame: &mut Frame,
    area: Rect,
    title: String,
    rows: &[DisplayRow],
    selected_idx: Option<usize>,
) {
    let block = bordered(title);

    if rows.is_empty() {
        let empty = Paragraph::new("No history yet").style(Style::default().fg(MUTED)).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(4));
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut header = vec![
                Span::styled(format!("{} → {}", row.from, row.to), Style::default().fg(EMERALD)),
                Span::raw("  "),
                Span::styled(row.time_string.clone(), Style::default().fg(MUTED)),
            ];
            if !row.service.is_empty() {
                header.push(Span::styled(
                    format!(" · {}", row.service),
                    Style::default().fg(MUTED),
                ));
            }

            ListItem::new(Text::from(vec![
                Line::from(header),
                Line::from(Span::styled(
                    preview_line(&row.query, width),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    preview_line(&row.translated, width),
                    Style::default().fg(MUTED),
                )),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(BRIGHT) // Bright text
            .bg(EMERALD) // Emerald background
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default().with_selected(selected_idx);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(frame: &mut Frame, area: Rect, detail: &LiveQueryDetail) {
    let label = Style::default().fg(MUTED);

    let content = match detail.request() {
        Some(request) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Query: ", label),
                    Span::raw(format!("{} → {}", request.from, request.to)),
                ]),
                Line::from(vec![
                    Span::styled("Engine: ", label),
                    Span::raw(detail.engine_name().to_string()),
                ]),
                Line::from(""),
            ];
            let query = strip_ansi_codes(&request.text);
            lines.extend(query.lines().map(|line| Line::from(line.to_string())));
            lines.push(Line::from(""));

            match detail.state() {
                DetailState::Empty | DetailState::Pending => {
                    lines.push(Line::from(Span::styled("Running…", label)));
                }
                DetailState::Ready { result } => {
                    lines.push(Line::from(Span::styled("Result:", label)));
                    let result = strip_ansi_codes(result);
                    lines.extend(result.lines().map(|line| Line::from(line.to_string())));
                }
                DetailState::Failed { error } => {
                    lines.push(Line::from(Span::styled(
                        format!("✗ {}", strip_ansi_codes(error)),
                        Style::default().fg(RED),
                    )));
                }
            }
            Text::from(lines)
        }
        None => Text::from("No entry selected"),
    };

    let paragraph = Paragraph::new(content)
        .block(bordered(" Live result ".to_string()))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_about(frame: &mut Frame, area: Rect, spec: &WindowSpec) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("query-history {}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Browse, re-run and export your translation queries."),
        Line::from(""),
        Line::from(Span::styled("Esc: close", Style::default().fg(MUTED))),
    ]);

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(bordered(format!(" {} ", spec.title)))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_no_windows(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new("No open windows. h: history | ?: about | q: quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(MUTED));
    frame.render_widget(hint, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &ExportPrompt) {
    let title = format!(" Export {} to (Enter: save, Esc: cancel) ", prompt.format.label());
    let paragraph = Paragraph::new(format!("{}▏", prompt.input))
        .style(Style::default().fg(BRIGHT))
        .block(bordered(title).border_style(Style::default().fg(EMERALD)));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (status_text, style) = if let Some(message) = state.status_message {
        let fg = match message.message_type {
            MessageType::Success => EMERALD,
            MessageType::Error => RED,
        };
        (format!(" {} ", message.text), Style::default().fg(fg).bg(BAR_BG))
    } else if state.rows.is_empty() {
        (
            " No entries | ?: about | q: quit ".to_string(),
            Style::default().fg(BRIGHT).bg(BAR_BG),
        )
    } else {
        let mut parts = vec![format!("{} entries", state.rows.len())];

        if let Some(idx) = state.selected_idx {
            parts.push(format!("entry {}/{}", idx + 1, state.rows.len()));
        }

        parts.push("y/Y: copy query/result".to_string());
        parts.push("d: delete".to_string());
        parts.push("r: re-run".to_string());
        parts.push("e/E: export JSON/CSV".to_string());
        parts.push("q: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(BAR_BG))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}
