//! Reusable UI components for the LumiBank TUI

pub mod alert;
pub mod form_field;
pub mod form_screen;
pub mod status_display;

pub use alert::{AlertDialog, ConfirmChoice, ConfirmDialog};
pub use form_field::{Form, FormField, FormFieldType};
pub use form_screen::FormScreen;
pub use status_display::StatusDisplay;
