//! Upgrade dispatcher: runs one accepted socket from setup to close

use super::connection::{Connection, ConnectionOptions};
use super::frame::{close_code, close_reason};
use super::route::{ConnectionRoute, SetupArgs};
use super::types::WebSocketMessage;
use crate::errors::ErrorSink;
use crate::foundation::constants::READY_EVENT;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drive one upgraded socket.
///
/// The setup handler runs before any inbound frame is read. On success a
/// `ready` frame is sent; on failure the sink picks the status and the socket
/// is closed with `4000 + status`. Inbound frames are then routed until the
/// peer goes away.
pub async fn run_connection(
    socket: WebSocket,
    route: Arc<ConnectionRoute>,
    path_params: HashMap<String, String>,
    query: HashMap<String, String>,
    options: ConnectionOptions,
    sink: Arc<dyn ErrorSink>,
) {
    let (connection, outbound) = Connection::channel_with(Arc::clone(&route.validators), options);
    let id = connection.id();
    let (ws_tx, mut ws_rx) = socket.split();
    let writer = tokio::spawn(write_outbound(ws_tx, outbound));

    info!(target: "arbor::websocket", connection = %id, "connection opened");

    let setup = route
        .setup
        .call(SetupArgs {
            connection: connection.clone(),
            path_params,
            query,
        })
        .await;

    match setup {
        Ok(()) => {
            if let Err(e) = connection.emit(READY_EVENT, Value::Null) {
                debug!(target: "arbor::websocket", connection = %id, "ready frame not sent: {}", e);
            }
        }
        Err(error) => {
            warn!(target: "arbor::websocket", connection = %id, "setup handler failed: {}", error);
            let response = sink.report(error);
            let code = close_code(response.status);
            if connection.close(code, close_reason(response.error())).is_err() {
                debug!(target: "arbor::websocket", connection = %id, "connection already closed");
            }
        }
    }

    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => {
                // A closed connection only drains until the peer answers
                if !connection.is_closed() {
                    connection.dispatch_frame(&text).await;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(target: "arbor::websocket", connection = %id, "socket error: {}", e);
                break;
            }
        }
    }

    connection.shutdown();
    connection.clear_handlers().await;
    if let Err(e) = writer.await {
        debug!(target: "arbor::websocket", connection = %id, "writer task failed: {}", e);
    }

    info!(target: "arbor::websocket", connection = %id, "connection closed");
}

async fn write_outbound<S>(mut ws_tx: S, mut outbound: mpsc::UnboundedReceiver<WebSocketMessage>)
where
    S: futures_util::Sink<Message> + Unpin,
{
    while let Some(message) = outbound.recv().await {
        let is_close = message.is_close();
        if ws_tx.send(message.into()).await.is_err() || is_close {
            break;
        }
    }
}
