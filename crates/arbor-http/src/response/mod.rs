//! Response envelopes
//!
//! Every procedure answers with either
//! `{"success": true, "result": ...}` or `{"success": false, "error": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

/// Status plus JSON envelope produced by a dispatched procedure
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureResponse {
    pub status: u16,
    pub body: Value,
}

impl ProcedureResponse {
    /// Success envelope around the terminal handler's result
    pub fn success(result: Value) -> Self {
        Self {
            status: 200,
            body: json!({
                "success": true,
                "result": result,
            }),
        }
    }

    /// Error envelope; `error` is omitted from the body when `None`
    pub fn failure(status: u16, error: Option<Value>) -> Self {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        if let Some(error) = error {
            body.insert("error".to_string(), error);
        }

        Self {
            status,
            body: Value::Object(body),
        }
    }

    pub fn is_success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The envelope's `error` field, if present
    pub fn error(&self) -> Option<&Value> {
        self.body.get("error")
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProcedureResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body)).into_response()
    }
}
