//! The server: one axum fallback in front of both route tables

use super::endpoint::Endpoint;
use super::lifecycle::shutdown_signal;
use crate::config::{AppConfigTrait, ServerConfig};
use crate::errors::{EnvelopeSink, ErrorSink, HttpError, HttpResult, ProcedureError};
use crate::request::{parse_body, parse_query, HttpMethod, ProcedureRequest};
use crate::routing::{RouteMap, RouteTable};
use crate::websocket::upgrade::run_connection;
use crate::websocket::{ConnectionOptions, ConnectionRoute};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

struct DispatchState {
    config: ServerConfig,
    http: RouteTable<Endpoint>,
    connections: RouteTable<ConnectionRoute>,
    sink: Arc<dyn ErrorSink>,
}

/// Request/response and connection routes behind one listener
pub struct ArborServer {
    config: ServerConfig,
    http: RouteMap<Endpoint>,
    connections: RouteMap<ConnectionRoute>,
    sink: Option<Arc<dyn ErrorSink>>,
}

impl ArborServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            http: RouteMap::new(),
            connections: RouteMap::new(),
            sink: None,
        }
    }

    /// Server configured from `ARBOR_*` environment variables
    pub fn from_env() -> HttpResult<Self> {
        let config = ServerConfig::from_env()?;
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn routes(mut self, routes: RouteMap<Endpoint>) -> Self {
        self.http = routes;
        self
    }

    pub fn connections(mut self, routes: RouteMap<ConnectionRoute>) -> Self {
        self.connections = routes;
        self
    }

    /// Replace the default [`EnvelopeSink`]
    pub fn with_sink<S: ErrorSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn into_router(self) -> Router {
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(EnvelopeSink::new(self.config.verbose_errors)));
        let enable_tracing = self.config.enable_tracing;

        let state = Arc::new(DispatchState {
            config: self.config,
            http: RouteTable::new("http", self.http),
            connections: RouteTable::new("connections", self.connections),
            sink,
        });

        let router = Router::new().fallback(dispatch).with_state(state);
        if enable_tracing {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// Bind the configured address and serve until ctrl-c
    pub async fn serve(self) -> HttpResult<()> {
        self.config.validate()?;
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| HttpError::startup(format!("Failed to bind to {}: {}", addr, e)))?;

        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> HttpResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let router = self.into_router();

        info!(target: "arbor::server", "server listening on {}", addr);

        if let Err(e) = axum::serve(listener, router).with_graceful_shutdown(shutdown).await {
            error!(target: "arbor::server", "server error: {}", e);
            return Err(HttpError::startup(format!("Server failed: {}", e)));
        }

        info!(target: "arbor::server", "server stopped gracefully");
        Ok(())
    }
}

async fn dispatch(State(state): State<Arc<DispatchState>>, request: Request) -> Response {
    let (mut parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let base_path = state.config.base_path.as_str();

    if let Some(found) = state.connections.resolve(&path, base_path) {
        // Requests that are not upgrades fall through to HTTP handling
        if let Ok(upgrade) = WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
            let route = Arc::clone(found.terminal);
            let params = found.params;
            let query = parse_query(parts.uri.query());
            let options = ConnectionOptions {
                protocol_error_frames: state.config.protocol_error_frames,
                verbose_errors: state.config.verbose_errors,
            };
            let sink = Arc::clone(&state.sink);

            debug!(target: "arbor::websocket", path = %path, "upgrading connection");
            return upgrade
                .on_upgrade(move |socket| run_connection(socket, route, params, query, options, sink))
                .into_response();
        }
    }

    let sink = state.sink.as_ref();

    let Some(found) = state.http.resolve(&path, base_path) else {
        debug!(target: "arbor::http", method = %parts.method, path = %path, "no route matched");
        return sink
            .report(ProcedureError::not_found(format!("No route for {}", path)))
            .into_response();
    };

    let method = HttpMethod::from_axum(parts.method.clone());
    let Some(procedure) = found.terminal.handler_for(&method) else {
        return sink
            .report(
                ProcedureError::not_found(format!("Method {} not allowed for {}", method, path))
                    .with_status(405),
            )
            .into_response();
    };
    let procedure = procedure.clone();
    let params = found.params;

    let max_body_size = state.config.max_body_size;
    let bytes = match axum::body::to_bytes(body, max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return sink
                .report(ProcedureError::bad_request(format!("Could not read request body: {}", e)))
                .into_response();
        }
    };
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let body = match parse_body(&bytes, content_type, max_body_size) {
        Ok(body) => body,
        Err(error) => return sink.report(error).into_response(),
    };

    let request = ProcedureRequest::new(method, path)
        .with_headers(parts.headers)
        .with_query(parse_query(parts.uri.query()))
        .with_path_params(params)
        .with_body(body);

    procedure.call(request, sink).await.into_response()
}
