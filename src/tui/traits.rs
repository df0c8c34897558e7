//! Core traits for the LumiBank TUI screens

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::models::Route;
use crate::store::FlowContext;
use crate::tui::operations::{SubmitOutcome, SubmitRequest};

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to a different route
    NavigateTo(Route),
    /// Quit the application
    Quit,
    /// Hand a remote call to the submission runner
    Submit(SubmitRequest),
    /// No action taken
    None,
}

/// Core trait for all TUI screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the app
    fn handle_key_event(&mut self, key: KeyEvent, flows: &mut FlowContext) -> Result<ScreenAction>;

    /// Called when screen becomes active
    fn on_enter(&mut self, _flows: &FlowContext) {}

    /// Called when screen becomes inactive
    fn on_exit(&mut self) {}

    /// Result of a submission started by this screen
    fn on_submit_outcome(&mut self, _outcome: SubmitOutcome, _flows: &mut FlowContext) -> ScreenAction {
        ScreenAction::None
    }

    /// Periodic tick from the event loop
    fn on_tick(&mut self, _now: DateTime<Local>) -> ScreenAction {
        ScreenAction::None
    }

    /// Whether a request is in flight
    fn is_busy(&self) -> bool {
        false
    }

    /// Key help shown in the help popup
    fn help_text(&self) -> &'static str;
}

/// Trait for form handling
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        self.set_current_field((self.get_current_field() + 1) % total);
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);

    fn handle_cursor_left(&mut self);

    fn handle_cursor_right(&mut self);

    fn handle_cursor_home(&mut self);

    fn handle_cursor_end(&mut self);

    /// Flip show/hide on the current field if it is a password
    fn toggle_current_visibility(&mut self) -> bool;
}
