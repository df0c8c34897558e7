//! LumiBank Terminal User Interface (TUI)
//!
//! Hosts the PIN setup and password reset pages together with the landing
//! pages they lead to.

pub mod app;
pub mod components;
pub mod handlers;
pub mod operations;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;
pub use traits::{Screen, ScreenAction};
