//! Core validation traits

use crate::error::ValidationResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A single rule applied to one field value
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Validate a single value
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()>;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;
}

/// Parse-or-fail capability used by procedures and connection routes.
///
/// `parse` returns the accepted value, possibly normalized, or the errors
/// explaining why it was rejected. Implementations may await I/O.
#[async_trait]
pub trait Schema: Send + Sync {
    async fn parse(&self, value: Value) -> ValidationResult<Value>;

    /// Name used in logs
    fn schema_name(&self) -> &'static str {
        "schema"
    }
}

#[async_trait]
impl<S> Schema for Arc<S>
where
    S: Schema + ?Sized,
{
    async fn parse(&self, value: Value) -> ValidationResult<Value> {
        (**self).parse(value).await
    }

    fn schema_name(&self) -> &'static str {
        (**self).schema_name()
    }
}

#[async_trait]
impl<S> Schema for Box<S>
where
    S: Schema + ?Sized,
{
    async fn parse(&self, value: Value) -> ValidationResult<Value> {
        (**self).parse(value).await
    }

    fn schema_name(&self) -> &'static str {
        (**self).schema_name()
    }
}
