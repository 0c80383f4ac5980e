use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BugsinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Client(#[from] ClientError),

    #[error("Argument error: {0}")]
    Argument(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BugsinkError>;

/// A failed round trip to the API.
///
/// `code` is `None` when the request never produced an HTTP status
/// (connection refused, timeout, TLS failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub message: String,
    pub code: Option<u16>,
    pub response: Option<String>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            response: None,
        }
    }

    pub fn with_status(message: impl Into<String>, code: u16, response: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
            response: Some(response.into()),
        }
    }

    /// Prefix the message while keeping the status code and raw body.
    pub fn context(self, prefix: &str) -> Self {
        Self {
            message: format!("{}: {}", prefix, self.message),
            ..self
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError {
            message: error.to_string(),
            code: error.status().map(|s| s.as_u16()),
            response: None,
        }
    }
}
