//! Server configuration struct and environment loading

use super::defaults::ServerDefaults;
use super::{AppConfigTrait, ConfigError, ConfigSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// Configuration shared by the HTTP and connection dispatchers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix stripped from every request path before route matching
    pub base_path: String,
    /// Include error detail in error envelopes and close reasons
    pub verbose_errors: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Answer rejected connection frames with an `error` frame instead of
    /// dropping them
    pub protocol_error_frames: bool,
    /// Wrap the router in a tracing layer
    pub enable_tracing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: ServerDefaults::HOST.to_string(),
            port: ServerDefaults::PORT,
            base_path: ServerDefaults::BASE_PATH.to_string(),
            verbose_errors: ServerDefaults::VERBOSE_ERRORS,
            max_body_size: ServerDefaults::MAX_BODY_SIZE,
            protocol_error_frames: ServerDefaults::PROTOCOL_ERROR_FRAMES,
            enable_tracing: ServerDefaults::ENABLE_TRACING,
        }
    }
}

impl ServerConfig {
    pub fn with_base_path<S: Into<String>>(mut self, base_path: S) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    pub fn with_protocol_error_frames(mut self, enabled: bool) -> Self {
        self.protocol_error_frames = enabled;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// `host:port` string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfigTrait for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            host: env::var("ARBOR_HOST").unwrap_or_else(|_| ServerDefaults::HOST.to_string()),
            port: parse_env("ARBOR_PORT", "port", ServerDefaults::PORT, "valid port number (0-65535)")?,
            base_path: env::var("ARBOR_BASE_PATH")
                .unwrap_or_else(|_| ServerDefaults::BASE_PATH.to_string()),
            verbose_errors: parse_env(
                "ARBOR_VERBOSE_ERRORS",
                "verbose_errors",
                ServerDefaults::VERBOSE_ERRORS,
                "true or false",
            )?,
            max_body_size: parse_env(
                "ARBOR_MAX_BODY_SIZE",
                "max_body_size",
                ServerDefaults::MAX_BODY_SIZE,
                "valid number of bytes",
            )?,
            protocol_error_frames: parse_env(
                "ARBOR_PROTOCOL_ERROR_FRAMES",
                "protocol_error_frames",
                ServerDefaults::PROTOCOL_ERROR_FRAMES,
                "true or false",
            )?,
            enable_tracing: parse_env(
                "ARBOR_ENABLE_TRACING",
                "enable_tracing",
                ServerDefaults::ENABLE_TRACING,
                "true or false",
            )?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::validation_failed("Host must not be empty"));
        }

        if !self.base_path.is_empty()
            && (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
        {
            return Err(ConfigError::validation_failed(
                "Base path must be empty or start with '/' and not end with '/'",
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::validation_failed(
                "Maximum body size must be greater than 0",
            ));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        [
            ("host", "ARBOR_HOST"),
            ("port", "ARBOR_PORT"),
            ("base_path", "ARBOR_BASE_PATH"),
            ("verbose_errors", "ARBOR_VERBOSE_ERRORS"),
            ("max_body_size", "ARBOR_MAX_BODY_SIZE"),
            ("protocol_error_frames", "ARBOR_PROTOCOL_ERROR_FRAMES"),
            ("enable_tracing", "ARBOR_ENABLE_TRACING"),
        ]
        .into_iter()
        .map(|(field, var)| {
            let source = if env::var(var).is_ok() {
                ConfigSource::EnvVar(var.to_string())
            } else {
                ConfigSource::Default(field.to_string())
            };
            (field.to_string(), source)
        })
        .collect()
    }
}

fn parse_env<T: FromStr>(var: &str, field: &str, default: T, expected: &str) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            value: raw,
            expected: expected.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Global test lock to prevent concurrent environment modifications
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "ARBOR_HOST",
        "ARBOR_PORT",
        "ARBOR_BASE_PATH",
        "ARBOR_VERBOSE_ERRORS",
        "ARBOR_MAX_BODY_SIZE",
        "ARBOR_PROTOCOL_ERROR_FRAMES",
        "ARBOR_ENABLE_TRACING",
    ];

    fn clean_test_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();

        assert_eq!(config.port, ServerDefaults::PORT);
        assert_eq!(config.base_path, "");
        assert!(config.verbose_errors);
        assert!(!config.protocol_error_frames);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clean_test_env();
        env::set_var("ARBOR_PORT", "8080");
        env::set_var("ARBOR_BASE_PATH", "/api");
        env::set_var("ARBOR_VERBOSE_ERRORS", "false");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.base_path, "/api");
        assert!(!config.verbose_errors);
        assert_eq!(config.max_body_size, ServerDefaults::MAX_BODY_SIZE);

        let sources = config.config_sources();
        assert_eq!(sources["port"], ConfigSource::EnvVar("ARBOR_PORT".to_string()));
        assert_eq!(sources["host"], ConfigSource::Default("host".to_string()));

        clean_test_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clean_test_env();
        env::set_var("ARBOR_PORT", "not-a-port");

        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref field, .. }) if field == "port"));

        clean_test_env();
    }

    #[test]
    fn test_base_path_validation() {
        assert!(ServerConfig::default().with_base_path("/api").validate().is_ok());
        assert!(ServerConfig::default().with_base_path("api").validate().is_err());
        assert!(ServerConfig::default().with_base_path("/api/").validate().is_err());
    }
}
