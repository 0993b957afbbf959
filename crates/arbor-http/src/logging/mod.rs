//! Structured logging setup

pub mod config;

pub use config::*;
