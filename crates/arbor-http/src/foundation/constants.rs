//! Framework-wide constants

/// Separator between path segments
pub const PATH_SEPARATOR: char = '/';

/// Prefix marking a variable segment in a route template (`/user/:id`)
pub const VARIABLE_PREFIX: char = ':';

/// Context key written by the built-in body validation step
pub const INPUT_CONTEXT_KEY: &str = "input";

/// Context key written by the built-in query validation step
pub const QUERY_CONTEXT_KEY: &str = "query";

/// Event name of the frame sent once a connection's setup handler succeeds
pub const READY_EVENT: &str = "ready";

/// Event name used for protocol error frames, when enabled
pub const ERROR_EVENT: &str = "error";

/// Base of the close codes sent when a setup handler fails
pub const SETUP_FAILURE_CLOSE_BASE: u16 = 4000;

/// Close code used when `4000 + status` falls outside the private range
pub const FALLBACK_CLOSE_CODE: u16 = 4500;

/// Upper bound of the private close-code range
pub const MAX_PRIVATE_CLOSE_CODE: u16 = 4999;

/// Maximum length in bytes of a close frame reason
pub const MAX_CLOSE_REASON_BYTES: usize = 123;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;
