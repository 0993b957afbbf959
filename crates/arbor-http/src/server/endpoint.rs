//! HTTP terminals of the route tree

use crate::procedure::FinalizedProcedure;
use crate::request::HttpMethod;

/// Finalized procedures per method for one route, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Endpoint {
    handlers: Vec<(HttpMethod, FinalizedProcedure)>,
}

impl Endpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `procedure` to `method`. A repeated method keeps the first
    /// registration and drops the later one.
    pub fn on(mut self, method: HttpMethod, procedure: FinalizedProcedure) -> Self {
        if self.handler_for(&method).is_some() {
            tracing::debug!("Ignoring repeated {} handler on endpoint", method);
            return self;
        }
        self.handlers.push((method, procedure));
        self
    }

    pub fn get(self, procedure: FinalizedProcedure) -> Self {
        self.on(HttpMethod::GET, procedure)
    }

    pub fn post(self, procedure: FinalizedProcedure) -> Self {
        self.on(HttpMethod::POST, procedure)
    }

    pub fn put(self, procedure: FinalizedProcedure) -> Self {
        self.on(HttpMethod::PUT, procedure)
    }

    pub fn patch(self, procedure: FinalizedProcedure) -> Self {
        self.on(HttpMethod::PATCH, procedure)
    }

    pub fn delete(self, procedure: FinalizedProcedure) -> Self {
        self.on(HttpMethod::DELETE, procedure)
    }

    pub fn handler_for(&self, method: &HttpMethod) -> Option<&FinalizedProcedure> {
        self.handlers
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, procedure)| procedure)
    }

    pub fn methods(&self) -> Vec<&HttpMethod> {
        self.handlers.iter().map(|(method, _)| method).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::Procedure;
    use crate::request::ProcedureRequest;
    use serde_json::json;

    #[tokio::test]
    async fn test_method_lookup() {
        let endpoint = Endpoint::new()
            .get(Procedure::new().finalize(|_| async { Ok("list") }))
            .post(Procedure::new().finalize(|_| async { Ok("create") }))
            .get(Procedure::new().finalize(|_| async { Ok("shadowed") }));

        let get = endpoint.handler_for(&HttpMethod::GET).unwrap();
        let result = get.run(ProcedureRequest::new(HttpMethod::GET, "/")).await.unwrap();
        assert_eq!(result, json!("list"));

        assert!(endpoint.handler_for(&HttpMethod::DELETE).is_none());
        assert_eq!(endpoint.methods(), vec![&HttpMethod::GET, &HttpMethod::POST]);
    }
}
