//! Server configuration
//!
//! Configuration is read from `ARBOR_*` environment variables with defaults
//! from [`ServerDefaults`], then validated before the server starts.

pub mod defaults;
pub mod server_config;

pub use defaults::*;
pub use server_config::*;

use std::collections::HashMap;
use thiserror::Error;

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value loaded from environment variable
    EnvVar(String),
    /// Default value used
    Default(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ConfigError {
    pub fn validation_failed<T: Into<String>>(message: T) -> Self {
        ConfigError::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Common contract for configuration structs
pub trait AppConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}
