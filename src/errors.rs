//! Error types for the LumiBank service layer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse server response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Text shown to the user when the request could not complete
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Http(_) => "An error occurred".to_string(),
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}
