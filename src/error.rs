//! Error types and handling.

use reqwest::StatusCode;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// Session missing, expired, or rejected by the server
    #[error("Not authorized: please sign in again")]
    Unauthorized,

    /// Session state could not be accessed
    #[error("Session error: {0}")]
    Session(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// PDF export error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether a retry might succeed (connection problems, timeouts, 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.status().is_some_and(|s| s.is_server_error()),
            Self::Api { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

impl From<printpdf::Error> for AppError {
    fn from(e: printpdf::Error) -> Self {
        Self::Pdf(format!("{e:?}"))
    }
}
