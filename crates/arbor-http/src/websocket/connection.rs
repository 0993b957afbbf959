//! One persistent connection: outbound events and the inbound event router

use super::frame::{decode_frame, encode_frame, error_payload};
use super::route::ValidatorSpec;
use super::types::{ConnectionId, WebSocketError, WebSocketMessage, WebSocketResult};
use crate::errors::{ProcedureError, ProcedureResult};
use crate::foundation::constants::ERROR_EVENT;
use crate::foundation::types::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Handler registered for one event name
pub trait EventHandler: Send + Sync {
    fn call(&self, data: Value) -> BoxFuture<'static, ProcedureResult<()>>;
}

pub struct FnEventHandler<F> {
    f: F,
}

impl<F, Fut> EventHandler for FnEventHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = ProcedureResult<()>> + Send + 'static,
{
    fn call(&self, data: Value) -> BoxFuture<'static, ProcedureResult<()>> {
        Box::pin((self.f)(data))
    }
}

/// Per-connection error reporting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Answer rejected frames and failed handlers with an `error` frame
    pub protocol_error_frames: bool,
    /// Include messages in `error` frames
    pub verbose_errors: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            protocol_error_frames: false,
            verbose_errors: true,
        }
    }
}

/// What happened to one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handler spawned with the validated payload
    Dispatched { event: String },
    /// Not a `{"eventName", "data"}` envelope
    Malformed,
    /// No handler registered for the event
    UnknownEvent { event: String },
    /// Payload rejected by the event's schema
    InvalidPayload { event: String },
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched { .. })
    }
}

struct ConnectionInner {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<WebSocketMessage>,
    handlers: RwLock<HashMap<String, Arc<dyn EventHandler>>>,
    validators: Arc<ValidatorSpec>,
    options: ConnectionOptions,
    closed: AtomicBool,
}

/// Handle to one connection. Clones share the same socket and handler map,
/// so applications can keep them in their own registries for fan-out.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    /// Connection whose outbound messages go to the returned receiver
    pub fn channel(validators: Arc<ValidatorSpec>) -> (Self, mpsc::UnboundedReceiver<WebSocketMessage>) {
        Self::channel_with(validators, ConnectionOptions::default())
    }

    pub fn channel_with(
        validators: Arc<ValidatorSpec>,
        options: ConnectionOptions,
    ) -> (Self, mpsc::UnboundedReceiver<WebSocketMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            inner: Arc::new(ConnectionInner {
                id: ConnectionId::new(),
                sender,
                handlers: RwLock::new(HashMap::new()),
                validators,
                options,
                closed: AtomicBool::new(false),
            }),
        };
        (connection, receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    pub fn validators(&self) -> &ValidatorSpec {
        &self.inner.validators
    }

    /// Register the handler for `event_name`, replacing any existing one
    pub async fn on<N, F, Fut>(&self, event_name: N, handler: F)
    where
        N: Into<String>,
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProcedureResult<()>> + Send + 'static,
    {
        let event_name = event_name.into();
        let mut handlers = self.inner.handlers.write().await;
        if handlers
            .insert(event_name.clone(), Arc::new(FnEventHandler { f: handler }))
            .is_some()
        {
            debug!(target: "arbor::websocket", connection = %self.inner.id, event = %event_name, "replaced event handler");
        }
    }

    /// Remove the handler for `event_name`; returns whether one existed
    pub async fn off(&self, event_name: &str) -> bool {
        self.inner.handlers.write().await.remove(event_name).is_some()
    }

    pub async fn has_handler(&self, event_name: &str) -> bool {
        self.inner.handlers.read().await.contains_key(event_name)
    }

    /// Send `{"eventName", "data"}`. Fire-and-forget: success only means
    /// the frame was queued.
    pub fn emit<T: Serialize>(&self, event_name: &str, data: T) -> WebSocketResult<()> {
        let text = encode_frame(event_name, &data)?;
        self.send(WebSocketMessage::Text(text))
    }

    /// Queue a close frame; later sends fail
    pub fn close<R: Into<String>>(&self, code: u16, reason: R) -> WebSocketResult<()> {
        self.send(WebSocketMessage::close_with_reason(code, reason))?;
        self.mark_closed();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst) || self.inner.sender.is_closed()
    }

    fn send(&self, message: WebSocketMessage) -> WebSocketResult<()> {
        if self.is_closed() {
            return Err(WebSocketError::ConnectionClosed);
        }
        self.inner
            .sender
            .send(message)
            .map_err(|_| WebSocketError::ConnectionClosed)
    }

    fn mark_closed(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    /// Mark closed and release the writer, even if a close was already sent
    pub(crate) fn shutdown(&self) {
        self.mark_closed();
        let _ = self.inner.sender.send(WebSocketMessage::Close(None));
    }

    /// Drop every handler so closures holding this connection are released
    pub(crate) async fn clear_handlers(&self) {
        self.inner.handlers.write().await.clear();
    }

    /// Route one inbound text frame.
    ///
    /// The envelope is parsed, the handler looked up and the payload
    /// validated before the handler is spawned, so frames are validated in
    /// arrival order while handlers may finish in any order.
    pub async fn dispatch_frame(&self, text: &str) -> DispatchOutcome {
        let frame = match decode_frame(text) {
            Ok(frame) => frame,
            Err(e) => {
                self.reject(ProcedureError::bad_request(format!("Malformed frame: {}", e)));
                return DispatchOutcome::Malformed;
            }
        };

        let handler = self.inner.handlers.read().await.get(&frame.event_name).cloned();
        let Some(handler) = handler else {
            self.reject(ProcedureError::not_found(format!(
                "No handler for event '{}'",
                frame.event_name
            )));
            return DispatchOutcome::UnknownEvent {
                event: frame.event_name,
            };
        };

        let data = match self.inner.validators.get(&frame.event_name) {
            Some(schema) => match schema.parse(frame.data).await {
                Ok(data) => data,
                Err(errors) => {
                    self.reject(ProcedureError::bad_request(errors.message()));
                    return DispatchOutcome::InvalidPayload {
                        event: frame.event_name,
                    };
                }
            },
            None => frame.data,
        };

        let connection = self.clone();
        let event = frame.event_name.clone();
        tokio::spawn(async move {
            if let Err(error) = handler.call(data).await {
                warn!(target: "arbor::websocket", connection = %connection.id(), event = %event, "event handler failed: {}", error);
                connection.send_error(&error);
            }
        });

        DispatchOutcome::Dispatched {
            event: frame.event_name,
        }
    }

    fn reject(&self, error: ProcedureError) {
        debug!(target: "arbor::websocket", connection = %self.inner.id, "dropped frame: {}", error);
        self.send_error(&error);
    }

    fn send_error(&self, error: &ProcedureError) {
        if !self.inner.options.protocol_error_frames {
            return;
        }
        let field = error.error_field(self.inner.options.verbose_errors);
        if let Err(e) = self.emit(ERROR_EVENT, error_payload(field.as_ref())) {
            debug!(target: "arbor::websocket", connection = %self.inner.id, "could not send error frame: {}", e);
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.inner.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
