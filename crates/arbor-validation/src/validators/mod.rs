//! Built-in field rules

pub mod length;
pub mod numeric;
pub mod pattern;
pub mod required;
