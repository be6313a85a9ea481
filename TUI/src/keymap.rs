use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::ui_state::Screen;

/// Map a key press to an action for the given screen.
pub fn action_for_key(key: KeyEvent, screen: Screen) -> Option<Action> {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match screen {
        Screen::Gallery => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => Some(Action::PrevCategory),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => Some(Action::NextCategory),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::Enter => Some(Action::OpenHighlighted),
            KeyCode::Char('c') | KeyCode::Char('y') => Some(Action::CopyHighlighted),
            _ => None,
        },
        Screen::Generator => match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => Some(Action::Back),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Enter | KeyCode::Char('g') => Some(Action::Generate),
            KeyCode::Char('c') | KeyCode::Char('y') => Some(Action::CopyHighlighted),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollOutputUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollOutputDown),
            KeyCode::F(2) => Some(Action::ToggleRawOutput),
            _ => None,
        },
    }
}
