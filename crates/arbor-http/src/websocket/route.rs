//! Connection route descriptors

use super::connection::Connection;
use crate::errors::ProcedureResult;
use crate::foundation::types::BoxFuture;
use arbor_validation::Schema;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Payload schemas per receivable event, shared read-only by every
/// connection on a route. Events without a schema receive raw data.
#[derive(Clone, Default)]
pub struct ValidatorSpec {
    schemas: HashMap<String, Arc<dyn Schema>>,
}

impl ValidatorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event<N, S>(mut self, event_name: N, schema: S) -> Self
    where
        N: Into<String>,
        S: Schema + 'static,
    {
        self.schemas.insert(event_name.into(), Arc::new(schema));
        self
    }

    pub fn get(&self, event_name: &str) -> Option<&Arc<dyn Schema>> {
        self.schemas.get(event_name)
    }

    pub fn contains(&self, event_name: &str) -> bool {
        self.schemas.contains_key(event_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl std::fmt::Debug for ValidatorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut events: Vec<&String> = self.schemas.keys().collect();
        events.sort();
        f.debug_struct("ValidatorSpec").field("events", &events).finish()
    }
}

/// Arguments of a connection's setup handler
#[derive(Clone)]
pub struct SetupArgs {
    pub connection: Connection,
    pub path_params: HashMap<String, String>,
    pub query: HashMap<String, String>,
}

/// Runs once per accepted connection. Failing it closes the socket with a
/// code derived from the reported status.
pub trait SetupHandler: Send + Sync {
    fn call(&self, args: SetupArgs) -> BoxFuture<'static, ProcedureResult<()>>;
}

pub struct FnSetupHandler<F> {
    f: F,
}

impl<F, Fut> SetupHandler for FnSetupHandler<F>
where
    F: Fn(SetupArgs) -> Fut + Send + Sync,
    Fut: Future<Output = ProcedureResult<()>> + Send + 'static,
{
    fn call(&self, args: SetupArgs) -> BoxFuture<'static, ProcedureResult<()>> {
        Box::pin((self.f)(args))
    }
}

/// Terminal of the connection route tree
#[derive(Clone)]
pub struct ConnectionRoute {
    pub validators: Arc<ValidatorSpec>,
    pub setup: Arc<dyn SetupHandler>,
}

impl ConnectionRoute {
    pub fn new<F, Fut>(validators: ValidatorSpec, setup: F) -> Self
    where
        F: Fn(SetupArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProcedureResult<()>> + Send + 'static,
    {
        Self {
            validators: Arc::new(validators),
            setup: Arc::new(FnSetupHandler { f: setup }),
        }
    }
}

impl std::fmt::Debug for ConnectionRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRoute")
            .field("validators", &self.validators)
            .finish()
    }
}
