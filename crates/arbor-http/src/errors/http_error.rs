//! Server lifecycle errors
//!
//! Failures outside a single request: configuration, binding, serving.
//! Per-request failures are [`ProcedureError`](super::ProcedureError)s.

use crate::config::ConfigError;
use thiserror::Error;

/// Result type for server operations
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Server startup failed: {message}")]
    StartupFailed { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError {
    pub fn startup<T: Into<String>>(message: T) -> Self {
        HttpError::StartupFailed {
            message: message.into(),
        }
    }

    /// Get error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            HttpError::StartupFailed { .. } => "SERVER_STARTUP_FAILED",
            HttpError::Config(_) => "CONFIGURATION_ERROR",
            HttpError::Io(_) => "IO_ERROR",
        }
    }
}
