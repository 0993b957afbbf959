//! The error sink: the single place where a failure becomes a response.

use super::ProcedureError;
use crate::response::ProcedureResponse;
use std::sync::Arc;
use tracing::{debug, error};

/// Turns a failure into an error envelope and status.
///
/// Implementations must be total: `report` cannot fail and always produces a
/// response.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: ProcedureError) -> ProcedureResponse;
}

impl<S: ErrorSink + ?Sized> ErrorSink for Arc<S> {
    fn report(&self, error: ProcedureError) -> ProcedureResponse {
        (**self).report(error)
    }
}

/// Default sink: status from the error, detail only when `verbose` is set.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeSink {
    pub verbose: bool,
}

impl EnvelopeSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Default for EnvelopeSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ErrorSink for EnvelopeSink {
    fn report(&self, err: ProcedureError) -> ProcedureResponse {
        let status = err.status();

        if err.kind().is_client_error() {
            debug!(status, kind = %err.kind(), "procedure rejected: {}", err.message());
        } else {
            error!(status, typed = err.is_typed(), "procedure failed: {}", err.message());
        }

        ProcedureResponse::failure(status, err.error_field(self.verbose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verbose_typed_error() {
        let response = EnvelopeSink::new(true).report(ProcedureError::unauthorized("no"));

        assert_eq!(response.status, 401);
        assert_eq!(
            response.body,
            json!({"success": false, "error": {"type": "UNAUTHORIZED", "message": "no"}})
        );
    }

    #[test]
    fn test_verbose_untyped_error_is_a_string() {
        let response = EnvelopeSink::new(true).report(ProcedureError::untyped("db offline"));

        assert_eq!(response.status, 500);
        assert_eq!(response.body, json!({"success": false, "error": "db offline"}));
    }

    #[test]
    fn test_quiet_sink_hides_detail() {
        let response = EnvelopeSink::new(false).report(ProcedureError::forbidden("secret"));

        assert_eq!(response.status, 403);
        assert_eq!(response.body, json!({"success": false}));
    }

    #[test]
    fn test_override_status_wins() {
        let response =
            EnvelopeSink::default().report(ProcedureError::not_found("no method").with_status(405));
        assert_eq!(response.status, 405);
    }
}
