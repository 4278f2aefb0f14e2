// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Ctrl chords drive the session; plain keys edit the message line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::TuiState;

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Redraw only (input edited, scrolled, or nothing happened).
    None,
    Connect,
    Disconnect,
    ClearChat,
    Refresh,
    /// User submitted a typed message.
    Send(String),
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('k') => Action::Connect,
            KeyCode::Char('d') => Action::Disconnect,
            KeyCode::Char('l') => Action::ClearChat,
            KeyCode::Char('r') => Action::Refresh,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            Action::None
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            Action::None
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            Action::None
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            Action::None
        }
        KeyCode::Enter => match state.submit_input() {
            Some(text) => Action::Send(text),
            None => Action::None,
        },
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            Action::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            Action::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            Action::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            Action::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            Action::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            Action::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            Action::None
        }
        KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}
