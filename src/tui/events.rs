use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::export::ExportFormat;

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    CloseWindow,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    CopyQuery,
    CopyResult,
    DeleteSelected,
    ClearAll,
    Export(ExportFormat),
    RetryQuery,
    ShowAbout,
    ShowHistory,
    PromptInput(char),
    PromptBackspace,
    PromptConfirm,
    PromptCancel,
    None,
}

/// Whether keys go to the list or to the export path prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Prompt,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, mode: InputMode) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(key_to_action(key, mode));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent, mode: InputMode) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('p') if mode == InputMode::Browse => Action::MoveUp,
            KeyCode::Char('n') if mode == InputMode::Browse => Action::MoveDown,
            _ => Action::None,
        };
    }

    match mode {
        InputMode::Prompt => match key.code {
            KeyCode::Enter => Action::PromptConfirm,
            KeyCode::Esc => Action::PromptCancel,
            KeyCode::Backspace => Action::PromptBackspace,
            KeyCode::Char(c) => Action::PromptInput(c),
            _ => Action::None,
        },
        InputMode::Browse => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => Action::CloseWindow,

            KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,

            KeyCode::Char('y') => Action::CopyQuery,
            KeyCode::Char('Y') => Action::CopyResult,
            KeyCode::Char('d') | KeyCode::Delete => Action::DeleteSelected,
            KeyCode::Char('C') => Action::ClearAll,
            KeyCode::Char('e') => Action::Export(ExportFormat::Json),
            KeyCode::Char('E') => Action::Export(ExportFormat::Csv),
            KeyCode::Char('r') => Action::RetryQuery,

            KeyCode::Char('?') => Action::ShowAbout,
            KeyCode::Char('h') => Action::ShowHistory,
            _ => Action::None,
        },
    }
}
