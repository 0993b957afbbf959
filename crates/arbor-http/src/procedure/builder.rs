//! Persistent procedure builder
//!
//! Steps live in a shared singly linked list that grows at the tail.
//! Extending a procedure allocates one node pointing at the receiver's tail,
//! so branches derived from the same base share its prefix and never see
//! each other's steps.

use super::finalized::{FinalizedProcedure, FnHandler};
use super::step::{FnStep, ProcedureArgs, SchemaStep, SchemaTarget, Step};
use crate::errors::ProcedureResult;
use arbor_validation::Schema;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

struct StepNode {
    step: Arc<dyn Step>,
    prev: Option<Arc<StepNode>>,
}

/// Immutable ordered sequence of steps
#[derive(Clone, Default)]
pub struct Procedure {
    tail: Option<Arc<StepNode>>,
    len: usize,
}

impl Procedure {
    pub fn new() -> Self {
        Self::default()
    }

    /// New procedure with `step` appended; `self` is unchanged
    pub fn extend_with<S: Step + 'static>(&self, step: S) -> Self {
        Self {
            tail: Some(Arc::new(StepNode {
                step: Arc::new(step),
                prev: self.tail.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Append an async closure step
    pub fn extend<F, Fut>(&self, f: F) -> Self
    where
        F: Fn(ProcedureArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProcedureResult<Value>> + Send + 'static,
    {
        self.extend_with(FnStep::new(f))
    }

    /// Validate the request body and store it under `input`
    pub fn input<S: Schema + 'static>(&self, schema: S) -> Self {
        self.extend_with(SchemaStep::new(SchemaTarget::Body, Arc::new(schema)))
    }

    /// Validate the query parameters and store them under `query`
    pub fn query<S: Schema + 'static>(&self, schema: S) -> Self {
        self.extend_with(SchemaStep::new(SchemaTarget::Query, Arc::new(schema)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Steps in execution order
    pub fn steps(&self) -> Vec<Arc<dyn Step>> {
        let mut steps = Vec::with_capacity(self.len);
        let mut node = self.tail.as_ref();
        while let Some(current) = node {
            steps.push(Arc::clone(&current.step));
            node = current.prev.as_ref();
        }
        steps.reverse();
        steps
    }

    /// Pair the steps with a terminal handler
    pub fn finalize<F, Fut, R>(&self, handler: F) -> FinalizedProcedure
    where
        F: Fn(ProcedureArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProcedureResult<R>> + Send + 'static,
        R: Serialize + Send + 'static,
    {
        FinalizedProcedure::new(self.steps(), Arc::new(FnHandler::new(handler)))
    }
}

impl std::fmt::Debug for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.steps().iter().map(|s| s.name().to_string()).collect();
        f.debug_struct("Procedure").field("steps", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tag(name: &'static str) -> impl Fn(ProcedureArgs) -> std::future::Ready<ProcedureResult<Value>> {
        move |_| std::future::ready(Ok(json!({ "tag": name })))
    }

    #[test]
    fn test_extend_does_not_mutate_receiver() {
        let base = Procedure::new().extend(tag("auth"));
        let child = base.extend(tag("admin"));

        assert_eq!(base.len(), 1);
        assert_eq!(child.len(), 2);
        assert!(Procedure::new().is_empty());
    }

    #[test]
    fn test_branches_share_prefix_independently() {
        let base = Procedure::new().extend(tag("auth"));
        let left = base.extend(tag("left"));
        let right = base.extend(tag("right")).extend(tag("extra"));

        let base_steps = base.steps();
        let left_steps = left.steps();
        let right_steps = right.steps();

        assert_eq!(left_steps.len(), 2);
        assert_eq!(right_steps.len(), 3);
        // Shared prefix is the same allocation
        assert!(Arc::ptr_eq(&base_steps[0], &left_steps[0]));
        assert!(Arc::ptr_eq(&base_steps[0], &right_steps[0]));
        assert!(!Arc::ptr_eq(&left_steps[1], &right_steps[1]));
    }

    #[test]
    fn test_schema_step_names() {
        let procedure = Procedure::new()
            .input(arbor_validation::Any)
            .query(arbor_validation::Any);

        let names: Vec<String> = procedure.steps().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["input", "query"]);
    }
}
