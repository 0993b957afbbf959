//! Connection types over axum's websocket messages

use axum::extract::ws;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebSocketMessage {
    Text(String),
    Binary(Vec<u8>),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close(Option<CloseFrame>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseFrame {
    pub code: u16,
    pub reason: String,
}

impl WebSocketMessage {
    pub fn text<T: Into<String>>(content: T) -> Self {
        Self::Text(content.into())
    }

    pub fn close_with_reason<R: Into<String>>(code: u16, reason: R) -> Self {
        Self::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        }))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close(_))
    }
}

impl From<ws::Message> for WebSocketMessage {
    fn from(msg: ws::Message) -> Self {
        match msg {
            ws::Message::Text(text) => Self::Text(text),
            ws::Message::Binary(data) => Self::Binary(data),
            ws::Message::Ping(data) => Self::Ping(data),
            ws::Message::Pong(data) => Self::Pong(data),
            ws::Message::Close(frame) => Self::Close(frame.map(|f| CloseFrame {
                code: f.code,
                reason: f.reason.into_owned(),
            })),
        }
    }
}

impl From<WebSocketMessage> for ws::Message {
    fn from(msg: WebSocketMessage) -> Self {
        match msg {
            WebSocketMessage::Text(text) => ws::Message::Text(text),
            WebSocketMessage::Binary(data) => ws::Message::Binary(data),
            WebSocketMessage::Ping(data) => ws::Message::Ping(data),
            WebSocketMessage::Pong(data) => ws::Message::Pong(data),
            WebSocketMessage::Close(frame) => ws::Message::Close(frame.map(|f| ws::CloseFrame {
                code: f.code,
                reason: f.reason.into(),
            })),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebSocketError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection closed")]
    ConnectionClosed,
}

pub type WebSocketResult<T> = Result<T, WebSocketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_frame_conversion() {
        let msg = WebSocketMessage::close_with_reason(4403, "{}");
        let axum_msg: ws::Message = msg.clone().into();

        match &axum_msg {
            ws::Message::Close(Some(frame)) => {
                assert_eq!(frame.code, 4403);
                assert_eq!(frame.reason, "{}");
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(WebSocketMessage::from(axum_msg), msg);
    }

    #[test]
    fn test_connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }
}
