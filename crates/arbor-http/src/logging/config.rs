//! Logging configuration and subscriber installation
//!
//! The library itself only emits `tracing` events under the `arbor::*`
//! targets; installing a subscriber is left to the binary or test that wants
//! the output.

use serde_json::{json, Value};
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Emit JSON lines instead of text
    pub json_format: bool,
    /// Multi-line human readable output
    pub pretty_print: bool,
    /// Fields logged once with the initialization event
    pub global_fields: serde_json::Map<String, Value>,
    /// Environment filter (e.g. "arbor=debug,tower_http=info")
    pub env_filter: Option<String>,
    pub service_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_print: true,
            global_fields: serde_json::Map::new(),
            env_filter: None,
            service_name: None,
        }
    }
}

impl LoggingConfig {
    /// JSON output, quiet dependencies
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            pretty_print: false,
            global_fields: env_field("production"),
            env_filter: Some("arbor=info,tower_http=warn,axum=warn".to_string()),
            service_name: None,
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            pretty_print: true,
            global_fields: env_field("development"),
            env_filter: Some("arbor=debug,tower_http=debug,axum=debug".to_string()),
            service_name: None,
        }
    }

    /// Minimal output for test runs
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            json_format: false,
            pretty_print: false,
            global_fields: env_field("test"),
            env_filter: Some("arbor=error".to_string()),
            service_name: None,
        }
    }

    pub fn with_global_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.global_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_service(mut self, name: &str) -> Self {
        self.service_name = Some(name.to_string());
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

fn env_field(env: &str) -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("env".to_string(), json!(env));
    fields
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))?;

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).json())
            .try_init()?;
    } else if config.pretty_print {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).pretty())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout))
            .try_init()?;
    }

    let mut init_msg = json!({
        "message": "Structured logging initialized",
        "level": config.level,
        "format": if config.json_format { "json" } else { "text" },
    });
    if let Some(name) = &config.service_name {
        init_msg["service_name"] = json!(name);
    }
    for (key, value) in config.global_fields {
        init_msg[key] = value;
    }
    tracing::info!(target: "arbor::logging", "{}", init_msg);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let prod = LoggingConfig::production();
        assert!(prod.json_format);
        assert_eq!(prod.global_fields["env"], json!("production"));

        let dev = LoggingConfig::development();
        assert!(dev.pretty_print);
        assert_eq!(dev.filter_directive(), "arbor=debug,tower_http=debug,axum=debug");
    }

    #[test]
    fn test_filter_falls_back_to_level() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter_directive(), "info");

        let config = config.with_env_filter("arbor=trace");
        assert_eq!(config.filter_directive(), "arbor=trace");
    }

    #[test]
    fn test_builder_fields() {
        let config = LoggingConfig::test()
            .with_service("chat")
            .with_global_field("region", "eu");

        assert_eq!(config.service_name.as_deref(), Some("chat"));
        assert_eq!(config.global_fields["region"], json!("eu"));
    }
}
