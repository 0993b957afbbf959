//! # arbor-http
//!
//! Request-handling core for typed request/response procedures and
//! persistent-connection endpoints:
//! - Declarative nested route trees compiled into a first-match-wins matcher
//! - Immutable procedure chains that accumulate per-request context
//! - Per-connection event routing with schema-validated payloads
//! - An axum adapter serving both trees behind one listener

pub mod config;
pub mod errors;
pub mod foundation;
pub mod logging;
pub mod procedure;
pub mod request;
pub mod response;
pub mod routing;
pub mod server;
pub mod websocket;

pub use config::{AppConfigTrait, ConfigError, ServerConfig};
pub use errors::{
    EnvelopeSink, ErrorKind, ErrorSink, HttpError, HttpResult, ProcedureError, ProcedureResult,
};
pub use foundation::BoxFuture;
pub use logging::{init_logging, LoggingConfig};
pub use procedure::{FinalizedProcedure, Procedure, ProcedureArgs, RequestContext, Step};
pub use request::{HttpMethod, ProcedureRequest};
pub use response::ProcedureResponse;
pub use routing::{CompiledTree, RouteMap, RouteMatch, RouteTable};
pub use server::{ArborServer, Endpoint};
pub use websocket::{
    Connection, ConnectionId, ConnectionRoute, DispatchOutcome, SetupArgs, ValidatorSpec,
};

pub use arbor_validation as validation;
