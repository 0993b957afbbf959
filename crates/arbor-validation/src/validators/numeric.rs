//! Numeric value validator

use crate::error::{ValidationError, ValidationResult};
use crate::traits::ValidationRule;
use async_trait::async_trait;
use serde_json::Value;

/// Validator for numeric constraints
#[derive(Debug, Clone, Default)]
pub struct NumericValidator {
    /// Minimum value (inclusive)
    pub min: Option<f64>,
    /// Maximum value (inclusive)
    pub max: Option<f64>,
    pub integer_only: bool,
    pub message: Option<String>,
}

impl NumericValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn integer_only(mut self, integer_only: bool) -> Self {
        self.integer_only = integer_only;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn fail(&self, field: &str, default_message: String, code: &str) -> ValidationResult<()> {
        let message = self.message.clone().unwrap_or(default_message);
        Err(ValidationError::with_code(field, message, code).into())
    }
}

#[async_trait]
impl ValidationRule for NumericValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if value.is_null() {
            return Ok(());
        }

        let number = match value.as_f64() {
            Some(number) => number,
            None => return self.fail(field, format!("{} must be a number", field), "invalid_type"),
        };

        if self.integer_only && number.fract() != 0.0 {
            return self.fail(field, format!("{} must be an integer", field), "integer");
        }

        if let Some(min) = self.min {
            if number < min {
                return self.fail(field, format!("{} must be at least {}", field, min), "min");
            }
        }

        if let Some(max) = self.max {
            if number > max {
                return self.fail(field, format!("{} must be at most {}", field, max), "max");
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "numeric"
    }
}
