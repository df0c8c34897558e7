//! LumiBank client: registration PIN setup and password reset flows

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod flow;
pub mod models;
pub mod store;
pub mod tui;
pub mod validation;
