//! Keyboard handling: editing, sending, scrolling, and view switching.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, View};
use super::constants::{SCROLL_LINES_PAGE, SCROLL_LINES_SMALL};

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Continue,
    Quit,
    /// Send the input as a tutor question or a challenge answer.
    Send(String),
    CancelChat,
    RefreshChallenge,
}

pub(crate) fn handle_key(key: KeyEvent, app: &mut App) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('r') => return Action::RefreshChallenge,
            _ => return Action::Continue,
        }
    }

    match key.code {
        KeyCode::Esc => {
            if app.is_streaming {
                Action::CancelChat
            } else if !app.input.is_empty() {
                app.input.clear();
                Action::Continue
            } else {
                Action::Quit
            }
        }
        KeyCode::Tab => {
            app.toggle_view();
            Action::Continue
        }
        KeyCode::Enter => {
            if app.is_streaming || app.input.trim().is_empty() {
                return Action::Continue;
            }
            let text = std::mem::take(&mut app.input);
            Action::Send(text.trim().to_string())
        }
        KeyCode::Backspace => {
            app.input.pop();
            Action::Continue
        }
        KeyCode::Up => {
            app.scroll_up(SCROLL_LINES_SMALL);
            Action::Continue
        }
        KeyCode::Down => {
            app.scroll_down(SCROLL_LINES_SMALL);
            Action::Continue
        }
        KeyCode::PageUp => {
            app.scroll_up(SCROLL_LINES_PAGE);
            Action::Continue
        }
        KeyCode::PageDown => {
            app.scroll_down(SCROLL_LINES_PAGE);
            Action::Continue
        }
        KeyCode::Char(c) => {
            if app.view == View::Challenge && app.input.is_empty() {
                // First keystroke of an answer starts the clock.
                app.challenge.answer_started_at.get_or_insert_with(Instant::now);
            }
            app.input.push(c);
            Action::Continue
        }
        _ => Action::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::LearningProfile;

    fn app() -> App {
        App::new("test-model".to_string(), LearningProfile::new(1), false)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_appends_to_input() {
        let mut app = app();
        handle_key(key(KeyCode::Char('h')), &mut app);
        handle_key(key(KeyCode::Char('i')), &mut app);
        assert_eq!(app.input, "hi");
    }

    #[test]
    fn enter_sends_trimmed_input_and_clears() {
        let mut app = app();
        app.input = "  what is a set?  ".to_string();
        let action = handle_key(key(KeyCode::Enter), &mut app);
        assert_eq!(action, Action::Send("what is a set?".to_string()));
        assert!(app.input.is_empty());
    }

    #[test]
    fn enter_ignored_while_streaming() {
        let mut app = app();
        app.is_streaming = true;
        app.input = "question".to_string();
        assert_eq!(handle_key(key(KeyCode::Enter), &mut app), Action::Continue);
        assert_eq!(app.input, "question");
    }

    #[test]
    fn esc_cancels_then_clears_then_quits() {
        let mut app = app();
        app.is_streaming = true;
        assert_eq!(handle_key(key(KeyCode::Esc), &mut app), Action::CancelChat);
        app.is_streaming = false;
        app.input = "draft".to_string();
        assert_eq!(handle_key(key(KeyCode::Esc), &mut app), Action::Continue);
        assert!(app.input.is_empty());
        assert_eq!(handle_key(key(KeyCode::Esc), &mut app), Action::Quit);
    }

    #[test]
    fn tab_toggles_view() {
        let mut app = app();
        assert_eq!(app.view, View::Tutor);
        handle_key(key(KeyCode::Tab), &mut app);
        assert_eq!(app.view, View::Challenge);
        handle_key(key(KeyCode::Tab), &mut app);
        assert_eq!(app.view, View::Tutor);
    }

    #[test]
    fn first_answer_keystroke_starts_timer() {
        let mut app = app();
        app.view = View::Challenge;
        assert!(app.challenge.answer_started_at.is_none());
        handle_key(key(KeyCode::Char('x')), &mut app);
        assert!(app.challenge.answer_started_at.is_some());
    }
}
