//! Wire envelopes and close-frame helpers
//!
//! Frames in both directions are `{"eventName": string, "data": any}`.

use super::types::WebSocketResult;
use crate::foundation::constants::{
    FALLBACK_CLOSE_CODE, MAX_CLOSE_REASON_BYTES, MAX_PRIVATE_CLOSE_CODE, SETUP_FAILURE_CLOSE_BASE,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundFrame {
    #[serde(rename = "eventName")]
    pub event_name: String,
    /// Absent `data` decodes as `null`
    #[serde(default)]
    pub data: Value,
}

#[derive(Serialize)]
struct OutboundFrame<'a, T: Serialize> {
    #[serde(rename = "eventName")]
    event_name: &'a str,
    data: &'a T,
}

pub fn decode_frame(text: &str) -> serde_json::Result<InboundFrame> {
    serde_json::from_str(text)
}

pub fn encode_frame<T: Serialize>(event_name: &str, data: &T) -> WebSocketResult<String> {
    Ok(serde_json::to_string(&OutboundFrame { event_name, data })?)
}

/// `{"error": field}`, or `{}` when the field is absent
pub fn error_payload(field: Option<&Value>) -> Value {
    let mut payload = Map::new();
    if let Some(field) = field {
        payload.insert("error".to_string(), field.clone());
    }
    Value::Object(payload)
}

/// Close code for a setup failure reported with `status`
pub fn close_code(status: u16) -> u16 {
    match SETUP_FAILURE_CLOSE_BASE.checked_add(status) {
        Some(code) if code <= MAX_PRIVATE_CLOSE_CODE => code,
        _ => FALLBACK_CLOSE_CODE,
    }
}

/// Close reason for an error field. A reason over the close-frame limit
/// keeps only the error type.
pub fn close_reason(field: Option<&Value>) -> String {
    let reason = error_payload(field).to_string();
    if reason.len() <= MAX_CLOSE_REASON_BYTES {
        return reason;
    }

    match field.and_then(|f| f.get("type")) {
        Some(kind) => json!({ "error": { "type": kind } }).to_string(),
        None => "{}".to_string(),
    }
}
