//! Parsed request handed to procedures

pub mod method;
pub mod request;

pub use method::HttpMethod;
pub use request::*;
