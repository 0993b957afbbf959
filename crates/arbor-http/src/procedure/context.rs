//! Per-request context accumulated by procedure steps

use crate::errors::{ProcedureError, ProcedureResult};
use crate::foundation::constants::{INPUT_CONTEXT_KEY, QUERY_CONTEXT_KEY};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Key/value map filled in step by step.
///
/// Merging is shallow: a later step writing an existing key replaces the
/// whole value. `input` and `query` are reserved for the built-in
/// validation steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    values: Map<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge a step's output. `Null` contributes nothing; anything other
    /// than an object is rejected.
    pub fn merge(&mut self, patch: Value) -> ProcedureResult<()> {
        match patch {
            Value::Null => Ok(()),
            Value::Object(entries) => {
                for (key, value) in entries {
                    self.values.insert(key, value);
                }
                Ok(())
            }
            other => Err(ProcedureError::untyped(format!(
                "Procedure step must return a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Deserialize the whole context into a typed view
    pub fn extract<T: DeserializeOwned>(&self) -> ProcedureResult<T> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            ProcedureError::untyped(format!("Context does not match the expected shape: {}", e))
        })
    }

    /// Deserialize one key
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ProcedureResult<T> {
        let value = self
            .values
            .get(key)
            .cloned()
            .ok_or_else(|| ProcedureError::untyped(format!("Context key '{}' is not set", key)))?;

        serde_json::from_value(value)
            .map_err(|e| ProcedureError::untyped(format!("Context key '{}': {}", key, e)))
    }

    /// Validated body written by [`Procedure::input`](super::Procedure::input)
    pub fn input<T: DeserializeOwned>(&self) -> ProcedureResult<T> {
        self.get_as(INPUT_CONTEXT_KEY)
    }

    /// Validated query written by [`Procedure::query`](super::Procedure::query)
    pub fn query<T: DeserializeOwned>(&self) -> ProcedureResult<T> {
        self.get_as(QUERY_CONTEXT_KEY)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_merge_is_shallow_last_writer_wins() {
        let mut context = RequestContext::new();
        context.merge(json!({"user": {"id": 1, "name": "ada"}, "a": 1})).unwrap();
        context.merge(json!({"user": {"id": 2}, "a": 2})).unwrap();

        assert_eq!(context.get("a"), Some(&json!(2)));
        // Replaced, not deep-merged
        assert_eq!(context.get("user"), Some(&json!({"id": 2})));
    }

    #[test]
    fn test_merge_rejects_non_objects() {
        let mut context = RequestContext::new();
        assert!(context.merge(Value::Null).is_ok());
        assert!(context.is_empty());

        let err = context.merge(json!([1, 2])).unwrap_err();
        assert!(!err.is_typed());
        assert!(err.message().contains("an array"));
    }

    #[test]
    fn test_typed_views() {
        #[derive(Deserialize)]
        struct Authed {
            user_id: u64,
        }

        let mut context = RequestContext::new();
        context.insert("user_id", json!(7));
        context.insert(INPUT_CONTEXT_KEY, json!({"title": "hi"}));

        let authed: Authed = context.extract().unwrap();
        assert_eq!(authed.user_id, 7);
        assert_eq!(context.input::<Value>().unwrap(), json!({"title": "hi"}));
        assert!(context.query::<Value>().is_err());
        assert!(context.get_as::<String>("user_id").is_err());
    }
}
