use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("HTTP request failed for {url}: {message}")]
    HttpError { url: String, message: String },

    #[error("Failed to parse response from {origin}: {message}")]
    ParseError { origin: String, message: String },

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Missing field in hot search data: {0}")]
    MissingField(&'static str),

    #[error("Failed to write report to {path}: {message}")]
    PersistError { path: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn http_error(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::HttpError {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Maps a reqwest failure, keeping timeouts distinguishable from other
    /// transport errors.
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(format!("Request to {} timed out", url))
        } else {
            Self::http_error(url, err)
        }
    }

    pub fn parse_error(origin: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::ParseError {
            origin: origin.into(),
            message: err.to_string(),
        }
    }

    pub fn persist_error(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::PersistError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
