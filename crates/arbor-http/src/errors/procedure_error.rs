//! Failures raised by procedure steps, terminal handlers and connection
//! setup handlers.
//!
//! Auth code signals rejection by returning one of the typed kinds, e.g.
//! `Err(ProcedureError::unauthorized("no"))`. Anything else that goes wrong
//! ends up as an untyped error and is reported as a server error.

use arbor_validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Result type for steps and handlers
pub type ProcedureResult<T> = Result<T, ProcedureError>;

/// The five error kinds understood by the error sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
}

impl ErrorKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ServerError => "SERVER_ERROR",
        }
    }

    /// Status used when no override is set
    pub fn default_status(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::ServerError => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::ServerError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a step, handler or setup handler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcedureError {
    #[error("{kind}: {message}")]
    Typed {
        kind: ErrorKind,
        message: String,
        status: Option<u16>,
    },

    #[error("{message}")]
    Untyped { message: String },
}

impl ProcedureError {
    pub fn new<T: Into<String>>(kind: ErrorKind, message: T) -> Self {
        ProcedureError::Typed {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn server_error<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::ServerError, message)
    }

    /// A failure with no kind attached
    pub fn untyped<T: Into<String>>(message: T) -> Self {
        ProcedureError::Untyped {
            message: message.into(),
        }
    }

    /// Replace the status the kind would map to.
    ///
    /// An untyped error becomes a typed `SERVER_ERROR` carrying the status.
    pub fn with_status(self, status: u16) -> Self {
        match self {
            ProcedureError::Typed { kind, message, .. } => ProcedureError::Typed {
                kind,
                message,
                status: Some(status),
            },
            ProcedureError::Untyped { message } => ProcedureError::Typed {
                kind: ErrorKind::ServerError,
                message,
                status: Some(status),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcedureError::Typed { kind, .. } => *kind,
            ProcedureError::Untyped { .. } => ErrorKind::ServerError,
        }
    }

    /// Status selected for this error: the override, else the kind's default
    pub fn status(&self) -> u16 {
        match self {
            ProcedureError::Typed { kind, status, .. } => status.unwrap_or(kind.default_status()),
            ProcedureError::Untyped { .. } => ErrorKind::ServerError.default_status(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ProcedureError::Typed { message, .. } | ProcedureError::Untyped { message } => message,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, ProcedureError::Typed { .. })
    }

    /// The `error` field of the envelope.
    ///
    /// Typed errors render as `{"type", "message"}`, untyped ones as the bare
    /// message; with verbose reporting off the field is absent.
    pub fn error_field(&self, verbose: bool) -> Option<Value> {
        if !verbose {
            return None;
        }

        Some(match self {
            ProcedureError::Typed { kind, message, .. } => json!({
                "type": kind.as_str(),
                "message": message,
            }),
            ProcedureError::Untyped { message } => Value::String(message.clone()),
        })
    }
}

impl From<ValidationErrors> for ProcedureError {
    fn from(errors: ValidationErrors) -> Self {
        ProcedureError::bad_request(errors.message())
    }
}

impl From<serde_json::Error> for ProcedureError {
    fn from(err: serde_json::Error) -> Self {
        ProcedureError::untyped(format!("JSON serialization error: {}", err))
    }
}

impl From<anyhow::Error> for ProcedureError {
    fn from(err: anyhow::Error) -> Self {
        ProcedureError::untyped(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_validation::ValidationError;

    #[test]
    fn test_status_table() {
        assert_eq!(ProcedureError::bad_request("x").status(), 400);
        assert_eq!(ProcedureError::unauthorized("x").status(), 401);
        assert_eq!(ProcedureError::forbidden("x").status(), 403);
        assert_eq!(ProcedureError::not_found("x").status(), 404);
        assert_eq!(ProcedureError::server_error("x").status(), 500);
        assert_eq!(ProcedureError::untyped("x").status(), 500);
    }

    #[test]
    fn test_status_override() {
        let error = ProcedureError::forbidden("locked").with_status(423);
        assert_eq!(error.status(), 423);
        assert_eq!(error.kind(), ErrorKind::Forbidden);

        let error = ProcedureError::untyped("boom").with_status(503);
        assert_eq!(error.kind(), ErrorKind::ServerError);
        assert_eq!(error.status(), 503);
    }

    #[test]
    fn test_error_field_shapes() {
        assert_eq!(
            ProcedureError::unauthorized("no").error_field(true),
            Some(json!({"type": "UNAUTHORIZED", "message": "no"}))
        );
        assert_eq!(
            ProcedureError::untyped("disk full").error_field(true),
            Some(json!("disk full"))
        );
        assert_eq!(ProcedureError::unauthorized("no").error_field(false), None);
    }

    #[test]
    fn test_conversions() {
        let validation = ValidationErrors::from(ValidationError::new("name", "name is required"));
        let error = ProcedureError::from(validation);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), "name: name is required");

        let error = ProcedureError::from(anyhow::anyhow!("connection refused"));
        assert!(!error.is_typed());
        assert_eq!(error.message(), "connection refused");
    }

    #[test]
    fn test_kind_serializes_to_wire_name() {
        assert_eq!(serde_json::to_value(ErrorKind::NotFound).unwrap(), json!("NOT_FOUND"));
    }
}
