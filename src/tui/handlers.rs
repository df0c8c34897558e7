//! Common event handlers for the LumiBank TUI

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::traits::{FormHandler, ScreenAction};

/// What a key meant to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    /// Edited or moved within the form
    Handled,
    /// Enter: the user asked to submit
    Submit,
    /// Esc: the user asked to leave the page
    Back,
    Ignored,
}

/// Common keyboard event handling utilities
pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Keys that apply everywhere regardless of the active screen
    pub fn handle_global_keys(key: KeyEvent) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(ScreenAction::Quit)
            }
            _ => None,
        }
    }

    /// Text editing and field navigation for any [`FormHandler`]
    pub fn handle_form_keys<T: FormHandler>(form: &mut T, key: KeyEvent) -> FormKey {
        match key.code {
            KeyCode::Enter => FormKey::Submit,
            KeyCode::Esc => FormKey::Back,
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                FormKey::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.previous_field();
                FormKey::Handled
            }
            KeyCode::F(2) => {
                form.toggle_current_visibility();
                FormKey::Handled
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => FormKey::Ignored,
            KeyCode::Char(c) => {
                form.handle_char_input(c);
                FormKey::Handled
            }
            KeyCode::Backspace => {
                form.handle_backspace();
                FormKey::Handled
            }
            KeyCode::Delete => {
                form.handle_delete();
                FormKey::Handled
            }
            KeyCode::Left => {
                form.handle_cursor_left();
                FormKey::Handled
            }
            KeyCode::Right => {
                form.handle_cursor_right();
                FormKey::Handled
            }
            KeyCode::Home => {
                form.handle_cursor_home();
                FormKey::Handled
            }
            KeyCode::End => {
                form.handle_cursor_end();
                FormKey::Handled
            }
            _ => FormKey::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_quit_requires_control() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(CommonKeyHandler::handle_global_keys(ctrl_c), Some(ScreenAction::Quit));

        let plain_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(CommonKeyHandler::handle_global_keys(plain_q), None);
    }
}
