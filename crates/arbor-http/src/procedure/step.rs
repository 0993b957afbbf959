//! Procedure steps

use super::context::RequestContext;
use crate::errors::ProcedureResult;
use crate::foundation::constants::{INPUT_CONTEXT_KEY, QUERY_CONTEXT_KEY};
use crate::foundation::types::BoxFuture;
use crate::request::ProcedureRequest;
use arbor_validation::Schema;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

/// What a step or terminal handler receives
#[derive(Debug, Clone)]
pub struct ProcedureArgs {
    pub request: Arc<ProcedureRequest>,
    /// Context accumulated by the steps that ran before
    pub context: RequestContext,
}

/// One context-producing step.
///
/// A step returns a JSON object whose entries are merged into the context,
/// `Null` to contribute nothing, or fails and ends the chain.
pub trait Step: Send + Sync {
    fn run(&self, args: ProcedureArgs) -> BoxFuture<'static, ProcedureResult<Value>>;

    fn name(&self) -> &str {
        "step"
    }
}

/// Step built from an async closure
pub struct FnStep<F> {
    f: F,
}

impl<F> FnStep<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> Step for FnStep<F>
where
    F: Fn(ProcedureArgs) -> Fut + Send + Sync,
    Fut: Future<Output = ProcedureResult<Value>> + Send + 'static,
{
    fn run(&self, args: ProcedureArgs) -> BoxFuture<'static, ProcedureResult<Value>> {
        Box::pin((self.f)(args))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTarget {
    Body,
    Query,
}

impl SchemaTarget {
    fn context_key(&self) -> &'static str {
        match self {
            SchemaTarget::Body => INPUT_CONTEXT_KEY,
            SchemaTarget::Query => QUERY_CONTEXT_KEY,
        }
    }
}

/// Built-in validation step: parses the body or query through a schema and
/// stores the result under `input` / `query`. A rejection is a
/// `BAD_REQUEST` carrying the validator's message.
pub struct SchemaStep {
    target: SchemaTarget,
    schema: Arc<dyn Schema>,
}

impl SchemaStep {
    pub fn new(target: SchemaTarget, schema: Arc<dyn Schema>) -> Self {
        Self { target, schema }
    }
}

impl Step for SchemaStep {
    fn run(&self, args: ProcedureArgs) -> BoxFuture<'static, ProcedureResult<Value>> {
        let schema = Arc::clone(&self.schema);
        let key = self.target.context_key();
        let raw = match self.target {
            SchemaTarget::Body => args.request.body.clone(),
            SchemaTarget::Query => args.request.query_value(),
        };

        Box::pin(async move {
            let parsed = schema.parse(raw).await?;
            let mut patch = Map::new();
            patch.insert(key.to_string(), parsed);
            Ok(Value::Object(patch))
        })
    }

    fn name(&self) -> &str {
        self.target.context_key()
    }
}
