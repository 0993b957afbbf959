//! Built-in schemas

use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::traits::{Schema, ValidationRule};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Object schema: an ordered list of fields, each with its own rules.
///
/// Missing fields are validated as `null`; fields without rules pass through
/// untouched.
#[derive(Clone, Default)]
pub struct Rules {
    fields: Vec<(String, Vec<Arc<dyn ValidationRule>>)>,
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("fields", &self.validated_fields())
            .finish()
    }
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation rule for a specific field
    pub fn field<R>(mut self, field: impl Into<String>, rule: R) -> Self
    where
        R: ValidationRule + 'static,
    {
        let field = field.into();
        let rule: Arc<dyn ValidationRule> = Arc::new(rule);

        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, rules)) => rules.push(rule),
            None => self.fields.push((field, vec![rule])),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order
    pub fn validated_fields(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[async_trait]
impl Schema for Rules {
    async fn parse(&self, value: Value) -> ValidationResult<Value> {
        let object = match value.as_object() {
            Some(object) => object,
            None => return Err(ValidationError::root("expected an object").into()),
        };

        let mut errors = ValidationErrors::new();
        for (field, rules) in &self.fields {
            let field_value = object.get(field).unwrap_or(&Value::Null);
            for rule in rules {
                if let Err(rule_errors) = rule.validate(field_value, field).await {
                    errors.merge(rule_errors);
                }
            }
        }

        if errors.is_empty() {
            Ok(value)
        } else {
            Err(errors)
        }
    }

    fn schema_name(&self) -> &'static str {
        "rules"
    }
}

/// Schema backed by a serde type: the value must deserialize into `T`, and
/// the accepted value is `T` serialized back, so defaults and renames apply.
pub struct Typed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typed<{}>", std::any::type_name::<T>())
    }
}

#[async_trait]
impl<T> Schema for Typed<T>
where
    T: DeserializeOwned + Serialize + Send,
{
    async fn parse(&self, value: Value) -> ValidationResult<Value> {
        let typed: T = serde_json::from_value(value)
            .map_err(|e| ValidationErrors::from(ValidationError::with_code(
                crate::error::ROOT_FIELD,
                e.to_string(),
                "invalid_shape",
            )))?;

        serde_json::to_value(typed)
            .map_err(|e| ValidationError::root(e.to_string()).into())
    }

    fn schema_name(&self) -> &'static str {
        "typed"
    }
}

/// Accepts any value unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

#[async_trait]
impl Schema for Any {
    async fn parse(&self, value: Value) -> ValidationResult<Value> {
        Ok(value)
    }

    fn schema_name(&self) -> &'static str {
        "any"
    }
}

/// Schema from a plain closure
#[derive(Clone)]
pub struct FnSchema<F> {
    check: F,
}

impl<F> FnSchema<F>
where
    F: Fn(Value) -> ValidationResult<Value> + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

#[async_trait]
impl<F> Schema for FnSchema<F>
where
    F: Fn(Value) -> ValidationResult<Value> + Send + Sync,
{
    async fn parse(&self, value: Value) -> ValidationResult<Value> {
        (self.check)(value)
    }

    fn schema_name(&self) -> &'static str {
        "fn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LengthValidator, NumericValidator, RequiredValidator};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct NewMessage {
        body: String,
        #[serde(default)]
        pinned: bool,
    }

    #[tokio::test]
    async fn test_rules_accepts_valid_object() {
        let rules = Rules::new()
            .field("name", RequiredValidator::new())
            .field("name", LengthValidator::new().max(8))
            .field("age", NumericValidator::new().min(18.0));

        let value = json!({"name": "Ada", "age": 36, "extra": true});
        assert_eq!(rules.parse(value.clone()).await.unwrap(), value);
        assert_eq!(rules.validated_fields(), vec!["name", "age"]);
    }

    #[tokio::test]
    async fn test_rules_collects_every_failure() {
        let rules = Rules::new()
            .field("name", RequiredValidator::new())
            .field("age", NumericValidator::new().min(18.0));

        let errors = rules.parse(json!({"age": 3})).await.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message(), "age: age must be at least 18; name: name is required");
    }

    #[tokio::test]
    async fn test_rules_rejects_non_objects() {
        let errors = Rules::new().parse(json!([1, 2])).await.unwrap_err();
        assert_eq!(errors.message(), "expected an object");
    }

    #[tokio::test]
    async fn test_typed_normalizes_defaults() {
        let schema = Typed::<NewMessage>::new();
        let parsed = schema.parse(json!({"body": "hi"})).await.unwrap();

        assert_eq!(parsed, json!({"body": "hi", "pinned": false}));
    }

    #[tokio::test]
    async fn test_typed_reports_serde_message() {
        let schema = Typed::<NewMessage>::new();
        let errors = schema.parse(json!({"pinned": true})).await.unwrap_err();

        assert!(errors.message().contains("missing field `body`"));
    }

    #[tokio::test]
    async fn test_fn_schema_and_any() {
        let even = FnSchema::new(|value: Value| match value.as_i64() {
            Some(n) if n % 2 == 0 => Ok(value),
            _ => Err(ValidationError::root("expected an even number").into()),
        });

        assert!(even.parse(json!(4)).await.is_ok());
        assert!(even.parse(json!(5)).await.is_err());
        assert_eq!(Any.parse(json!({"k": 1})).await.unwrap(), json!({"k": 1}));
    }
}
