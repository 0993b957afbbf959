//! Length validator for strings and arrays

use crate::error::{ValidationError, ValidationResult};
use crate::traits::ValidationRule;
use async_trait::async_trait;
use serde_json::Value;

/// Validator for string/array length constraints
#[derive(Debug, Clone, Default)]
pub struct LengthValidator {
    /// Minimum length (inclusive)
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    pub max: Option<usize>,
    /// Exact length required
    pub exact: Option<usize>,
    pub message: Option<String>,
}

impl LengthValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn exact(mut self, exact: usize) -> Self {
        self.exact = Some(exact);
        self
    }

    pub fn range(self, min: usize, max: usize) -> Self {
        self.min(min).max(max)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn length_of(value: &Value) -> Option<usize> {
        match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    fn is_within(&self, length: usize) -> bool {
        if let Some(exact) = self.exact {
            return length == exact;
        }
        self.min.map_or(true, |min| length >= min) && self.max.map_or(true, |max| length <= max)
    }

    fn error_message(&self, field: &str, actual: usize) -> String {
        if let Some(ref custom) = self.message {
            return custom.clone();
        }

        if let Some(exact) = self.exact {
            return format!("{} must be exactly {} long", field, exact);
        }

        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{} must be between {} and {} long", field, min, max),
            (Some(min), None) => format!("{} must be at least {} long", field, min),
            (None, Some(max)) => format!("{} must be at most {} long", field, max),
            (None, None) => format!("{} has invalid length: {}", field, actual),
        }
    }
}

#[async_trait]
impl ValidationRule for LengthValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if value.is_null() {
            return Ok(());
        }

        let length = Self::length_of(value).ok_or_else(|| {
            ValidationError::with_code(
                field,
                format!("{} must be a string or array", field),
                "invalid_type",
            )
        })?;

        if self.is_within(length) {
            Ok(())
        } else {
            Err(ValidationError::with_code(field, self.error_message(field, length), "length").into())
        }
    }

    fn rule_name(&self) -> &'static str {
        "length"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_range() {
        let validator = LengthValidator::new().range(2, 4);

        assert!(validator.validate(&json!("ab"), "code").await.is_ok());
        assert!(validator.validate(&json!("abcd"), "code").await.is_ok());
        assert!(validator.validate(&json!("a"), "code").await.is_err());
        assert!(validator.validate(&json!("abcde"), "code").await.is_err());
    }

    #[tokio::test]
    async fn test_unicode_counts_chars() {
        let validator = LengthValidator::new().exact(2);
        assert!(validator.validate(&json!("日本"), "word").await.is_ok());
    }

    #[tokio::test]
    async fn test_arrays_and_wrong_types() {
        let validator = LengthValidator::new().max(1);

        assert!(validator.validate(&json!([1]), "tags").await.is_ok());
        assert!(validator.validate(&json!([1, 2]), "tags").await.is_err());

        let errors = validator.validate(&json!(5), "tags").await.unwrap_err();
        assert_eq!(errors.get_field_errors("tags").unwrap()[0].code, "invalid_type");
    }

    #[tokio::test]
    async fn test_null_is_skipped() {
        let validator = LengthValidator::new().min(3);
        assert!(validator.validate(&Value::Null, "name").await.is_ok());
    }
}
