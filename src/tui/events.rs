use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

/// User actions from terminal events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    InsertChar(char),
    DeleteChar,
    ClearQuery,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    WheelUp { row: u16 },
    WheelDown { row: u16 },
    Resize { width: u16, height: u16 },
    Select,
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    CopyResumeCommand,
    None,
}

/// Poll for a terminal event and convert it to an action.
///
/// `confirming` selects the delete-confirmation key map.
pub fn poll_event(timeout: Duration, confirming: bool) -> anyhow::Result<Action> {
    if event::poll(timeout)? {
        return Ok(translate_event(event::read()?, confirming));
    }
    Ok(Action::None)
}

pub fn translate_event(event: Event, confirming: bool) -> Action {
    match event {
        Event::Resize(width, height) => Action::Resize { width, height },
        Event::Key(key) if key.kind != KeyEventKind::Press => Action::None,
        Event::Key(key) if confirming => confirm_key_to_action(key),
        Event::Key(key) => key_to_action(key),
        Event::Mouse(mouse) if !confirming => mouse_to_action(mouse),
        _ => Action::None,
    }
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        // Navigation (Emacs style)
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Actions
        (KeyCode::Enter, _) => Action::Select,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::RequestDelete,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyResumeCommand,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearQuery,

        // Query input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InsertChar(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

fn confirm_key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('y' | 'Y'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            Action::ConfirmDelete
        }
        (KeyCode::Char('n' | 'N'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            Action::CancelDelete
        }
        (KeyCode::Esc, _) => Action::CancelDelete,
        _ => Action::None,
    }
}

fn mouse_to_action(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollUp => Action::WheelUp { row: mouse.row },
        MouseEventKind::ScrollDown => Action::WheelDown { row: mouse.row },
        _ => Action::None,
    }
}
