//! Error types for the uptime reporter

use std::fmt;

pub type Result<T> = std::result::Result<T, ReporterError>;

#[derive(Debug)]
pub enum ReporterError {
    /// IO operation failed
    Io(std::io::Error),

    /// HTTP client construction or request failed
    Http(reqwest::Error),

    /// JSON serialization failed
    Json(serde_json::Error),

    /// Configuration error
    Config(String),

    /// Persisted uptime log exists but could not be parsed.
    /// Fatal for the run; the file is never overwritten.
    CorruptStore(String),

    /// Invalid observation field
    InvalidField(String),
}

impl fmt::Display for ReporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterError::Io(err) => write!(f, "IO error: {}", err),
            ReporterError::Http(err) => write!(f, "HTTP error: {}", err),
            ReporterError::Json(err) => write!(f, "JSON error: {}", err),
            ReporterError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ReporterError::CorruptStore(msg) => write!(f, "Corrupt uptime log: {}", msg),
            ReporterError::InvalidField(msg) => write!(f, "Invalid observation field: {}", msg),
        }
    }
}

impl std::error::Error for ReporterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReporterError::Io(err) => Some(err),
            ReporterError::Http(err) => Some(err),
            ReporterError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReporterError {
    fn from(err: std::io::Error) -> Self {
        ReporterError::Io(err)
    }
}

impl From<reqwest::Error> for ReporterError {
    fn from(err: reqwest::Error) -> Self {
        ReporterError::Http(err)
    }
}

impl From<serde_json::Error> for ReporterError {
    fn from(err: serde_json::Error) -> Self {
        ReporterError::Json(err)
    }
}
