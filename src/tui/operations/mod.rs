//! Async operation management for the LumiBank TUI

pub mod submission;

pub use submission::{ApiCall, SubmissionRunner, SubmitOutcome, SubmitRequest};
