//! Client error types

use hazard_domain::HazardError;
use thiserror::Error;

/// Reports API failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the server in a `{ "message": ... }` body
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server's message verbatim, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<ApiError> for HazardError {
    fn from(err: ApiError) -> Self {
        Self::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
