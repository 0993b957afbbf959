//! The parsed request object procedures run against
//!
//! Headers, cookies and query parameters are materialized up front and a JSON
//! body is already decoded, so steps never touch the transport.

use super::HttpMethod;
use crate::errors::{ProcedureError, ProcedureResult};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ProcedureRequest {
    pub method: HttpMethod,
    /// Request path as received, base path included
    pub path: String,
    pub headers: HeaderMap,
    pub cookies: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Variables bound by the route matcher
    pub path_params: HashMap<String, String>,
    /// Decoded JSON body, `Null` when the request had none or it was not JSON
    pub body: Value,
}

impl ProcedureRequest {
    pub fn new<P: Into<String>>(method: HttpMethod, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
            query: HashMap::new(),
            path_params: HashMap::new(),
            body: Value::Null,
        }
    }

    /// Replace the headers; cookies are re-parsed from the `Cookie` header.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.cookies = parse_cookies(&headers);
        self.headers = headers;
        self
    }

    /// Add one header (invalid names or values are ignored)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
            self.cookies = parse_cookies(&self.headers);
        }
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Query parameters as a JSON object of strings, the shape query
    /// schemas validate.
    pub fn query_value(&self) -> Value {
        Value::Object(
            self.query
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Deserialize the body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> ProcedureResult<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| ProcedureError::bad_request(format!("Invalid request body: {}", e)))
    }
}

/// Parse a raw query string; a missing or malformed query yields no
/// parameters. Repeated keys keep the last value.
pub fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    raw.and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

/// Collect `name=value` pairs from every `Cookie` header
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

/// True for `application/json` and any `+json` media type
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.contains('/') && essence.ends_with("+json"))
}

/// Decode a materialized body. Empty bodies and bodies that are not declared
/// as JSON decode to `Null`.
pub fn parse_body(
    bytes: &[u8],
    content_type: Option<&str>,
    max_body_size: usize,
) -> ProcedureResult<Value> {
    if bytes.len() > max_body_size {
        return Err(ProcedureError::bad_request(format!(
            "Request body exceeds {} bytes",
            max_body_size
        )));
    }

    if !content_type.is_some_and(is_json_content_type) {
        return Ok(Value::Null);
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(bytes)
        .map_err(|e| ProcedureError::bad_request(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_parse_query() {
        let query = parse_query(Some("page=2&sort=name&q=hello%20world"));

        assert_eq!(query.len(), 3);
        assert_eq!(query["page"], "2");
        assert_eq!(query["q"], "hello world");
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn test_cookies_from_headers() {
        let request = ProcedureRequest::new(HttpMethod::GET, "/")
            .with_header("cookie", "session=abc123; theme=\"dark\"")
            .with_header("cookie", "lang=en");

        assert_eq!(request.cookie("session"), Some("abc123"));
        assert_eq!(request.cookie("theme"), Some("dark"));
        assert_eq!(request.cookie("lang"), Some("en"));
        assert_eq!(request.cookie("missing"), None);
    }

    #[test]
    fn test_parse_body() {
        let json = Some("application/json");
        assert_eq!(parse_body(b"", json, 16).unwrap(), Value::Null);
        assert_eq!(parse_body(b"{\"a\":1}", json, 16).unwrap(), json!({"a": 1}));

        let err = parse_body(b"{not json", json, 16).unwrap_err();
        assert_eq!(err.status(), 400);

        let err = parse_body(b"[1,2,3,4,5,6,7,8,9]", json, 8).unwrap_err();
        assert!(err.message().contains("exceeds"));
    }

    #[test]
    fn test_parse_body_by_content_type() {
        let vendor = Some("application/vnd.api+json; charset=utf-8");
        assert_eq!(parse_body(b"[1]", vendor, 16).unwrap(), json!([1]));
        assert_eq!(parse_body(b"hello", Some("text/plain"), 16).unwrap(), Value::Null);
        assert_eq!(parse_body(b"{\"a\":1}", None, 16).unwrap(), Value::Null);

        assert!(is_json_content_type("Application/JSON"));
        assert!(!is_json_content_type("text/json-ish"));
        assert!(parse_body(b"hello", Some("text/plain"), 2).is_err());
    }

    #[test]
    fn test_typed_body_and_query_value() {
        #[derive(Deserialize)]
        struct Login {
            user: String,
        }

        let mut query = HashMap::new();
        query.insert("page".to_string(), "1".to_string());
        let request = ProcedureRequest::new(HttpMethod::POST, "/login")
            .with_body(json!({"user": "ada"}))
            .with_query(query);

        let login: Login = request.json().unwrap();
        assert_eq!(login.user, "ada");
        assert_eq!(request.query_value(), json!({"page": "1"}));
        assert!(request.json::<Vec<u8>>().is_err());
    }
}
