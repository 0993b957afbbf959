//! Procedure chains
//!
//! A [`Procedure`] is an immutable, appendable list of context-producing
//! steps. [`Procedure::finalize`] pairs it with a terminal handler, giving the
//! [`FinalizedProcedure`] that endpoints dispatch to.

pub mod builder;
pub mod context;
pub mod finalized;
pub mod step;

pub use builder::Procedure;
pub use context::RequestContext;
pub use finalized::{FinalizedProcedure, FnHandler, Handler};
pub use step::{FnStep, ProcedureArgs, SchemaStep, SchemaTarget, Step};
