use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Failure of a compile call.
///
/// Unlike [`Error`] this is an expected, user-displayable outcome: it carries
/// whatever the service (or the transport) reported so the caller can show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// HTTP status, absent when the request never got a response.
    pub status_code: Option<u16>,
    pub message: String,
}

impl CompileError {
    pub fn new(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// `"<status> <message>"`, or just the message for transport failures.
    pub fn summary(&self) -> String {
        match self.status_code {
            Some(code) => format!("{} {}", code, self.message),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for CompileError {}

impl From<reqwest::Error> for CompileError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status_code: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
