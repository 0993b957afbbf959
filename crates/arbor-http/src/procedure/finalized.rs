//! Finalized procedures: steps plus a terminal handler

use super::context::RequestContext;
use super::step::{ProcedureArgs, Step};
use crate::errors::{ErrorSink, ProcedureResult};
use crate::foundation::types::BoxFuture;
use crate::request::ProcedureRequest;
use crate::response::ProcedureResponse;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Terminal handler of a procedure
pub trait Handler: Send + Sync {
    fn call(&self, args: ProcedureArgs) -> BoxFuture<'static, ProcedureResult<Value>>;
}

/// Handler built from an async closure returning any serializable value
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut, R> Handler for FnHandler<F>
where
    F: Fn(ProcedureArgs) -> Fut + Send + Sync,
    Fut: Future<Output = ProcedureResult<R>> + Send + 'static,
    R: Serialize + Send + 'static,
{
    fn call(&self, args: ProcedureArgs) -> BoxFuture<'static, ProcedureResult<Value>> {
        let fut = (self.f)(args);
        Box::pin(async move {
            let result = fut.await?;
            Ok(serde_json::to_value(result)?)
        })
    }
}

/// The dispatchable unit attached to a route
#[derive(Clone)]
pub struct FinalizedProcedure {
    steps: Arc<[Arc<dyn Step>]>,
    handler: Arc<dyn Handler>,
}

impl FinalizedProcedure {
    pub fn new(steps: Vec<Arc<dyn Step>>, handler: Arc<dyn Handler>) -> Self {
        Self {
            steps: steps.into(),
            handler,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Run steps in order, then the handler.
    ///
    /// The first failure ends the run; no later step and no handler execute.
    pub async fn run(&self, request: ProcedureRequest) -> ProcedureResult<Value> {
        let request = Arc::new(request);
        let mut context = RequestContext::new();

        for step in self.steps.iter() {
            let patch = step
                .run(ProcedureArgs {
                    request: Arc::clone(&request),
                    context: context.clone(),
                })
                .await?;
            context.merge(patch)?;
        }

        self.handler.call(ProcedureArgs { request, context }).await
    }

    /// Run and wrap the outcome in an envelope; failures go to `sink`
    pub async fn call(&self, request: ProcedureRequest, sink: &dyn ErrorSink) -> ProcedureResponse {
        match self.run(request).await {
            Ok(result) => ProcedureResponse::success(result),
            Err(error) => sink.report(error),
        }
    }
}

impl std::fmt::Debug for FinalizedProcedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinalizedProcedure")
            .field("steps", &self.steps.len())
            .finish()
    }
}
