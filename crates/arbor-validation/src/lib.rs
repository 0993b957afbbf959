//! # arbor-validation
//!
//! Schema validation used by arbor procedures (`input` / `query` steps) and by
//! connection routes for per-event payloads. Every schema exposes a single
//! "parse or fail with a message" entry point.

pub mod error;
pub mod schema;
pub mod traits;
pub mod validators;

pub use error::{ValidationError, ValidationErrors, ValidationResult};
pub use schema::{Any, FnSchema, Rules, Typed};
pub use traits::{Schema, ValidationRule};

pub use validators::{
    length::LengthValidator, numeric::NumericValidator, pattern::PatternValidator,
    required::RequiredValidator,
};
