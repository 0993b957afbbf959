//! Regular expression validator

use crate::error::{ValidationError, ValidationResult};
use crate::traits::ValidationRule;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

/// Validator for custom regular expression patterns.
///
/// The whole string must match unless [`PatternValidator::full_match`] is
/// turned off.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
    anchored: Regex,
    pub message: Option<String>,
    pub full_match: bool,
}

impl PatternValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(regex: Regex) -> Self {
        // The source already compiled, so wrapping it in a group cannot fail
        let anchored = Regex::new(&format!("^(?:{})$", regex.as_str()))
            .unwrap_or_else(|_| regex.clone());
        Self {
            pattern: regex,
            anchored,
            message: None,
            full_match: true,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn full_match(mut self, full_match: bool) -> Self {
        self.full_match = full_match;
        self
    }

    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }

    fn matches(&self, text: &str) -> bool {
        if self.full_match {
            self.anchored.is_match(text)
        } else {
            self.pattern.is_match(text)
        }
    }
}

#[async_trait]
impl ValidationRule for PatternValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if value.is_null() {
            return Ok(());
        }

        let text = value.as_str().ok_or_else(|| {
            ValidationError::with_code(
                field,
                format!("{} must be a string for pattern validation", field),
                "invalid_type",
            )
        })?;

        if self.matches(text) {
            return Ok(());
        }

        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("{} does not match the required pattern", field));

        Err(ValidationError::with_code(field, message, "pattern_mismatch").into())
    }

    fn rule_name(&self) -> &'static str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_full_match() {
        let validator = PatternValidator::new(r"[a-z]+").unwrap();

        assert!(validator.validate(&json!("hello"), "slug").await.is_ok());
        assert!(validator.validate(&json!("hello1"), "slug").await.is_err());
    }

    #[tokio::test]
    async fn test_full_match_with_alternation() {
        let validator = PatternValidator::new("a|ab").unwrap();

        assert!(validator.validate(&json!("ab"), "code").await.is_ok());
        assert!(validator.validate(&json!("a"), "code").await.is_ok());
        assert!(validator.validate(&json!("abc"), "code").await.is_err());
    }

    #[tokio::test]
    async fn test_partial_match() {
        let validator = PatternValidator::new(r"\d").unwrap().full_match(false);

        assert!(validator.validate(&json!("room 7"), "name").await.is_ok());
        assert!(validator.validate(&json!("lobby"), "name").await.is_err());
    }

    #[tokio::test]
    async fn test_non_string() {
        let validator = PatternValidator::new(r".*").unwrap();
        assert!(validator.validate(&json!(12), "name").await.is_err());
    }
}
