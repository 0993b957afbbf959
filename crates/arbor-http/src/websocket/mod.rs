//! Persistent connections
//!
//! A [`ConnectionRoute`] pairs the per-event payload schemas of a route with
//! its setup handler. On a matched upgrade the setup handler receives the
//! [`Connection`], registers event handlers with [`Connection::on`] and
//! talks back with [`Connection::emit`].

pub mod connection;
pub mod frame;
pub mod route;
pub mod types;
pub mod upgrade;

pub use connection::{Connection, ConnectionOptions, DispatchOutcome, EventHandler, FnEventHandler};
pub use frame::{close_code, close_reason, decode_frame, encode_frame, error_payload, InboundFrame};
pub use route::{ConnectionRoute, FnSetupHandler, SetupArgs, SetupHandler, ValidatorSpec};
pub use types::{CloseFrame, ConnectionId, WebSocketError, WebSocketMessage, WebSocketResult};
