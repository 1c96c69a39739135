//! WebSocket relay to the upstream provider.
//!
//! # Responsibilities
//! - Dial the upstream WebSocket endpoint (key embedded in the URL)
//! - Bidirectional frame forwarding between client and upstream
//! - Redact the API key from upstream text frames
//!
//! # Data Flow
//! ```text
//! Client ←── WebSocket frames ──→ Proxy ←── WebSocket frames ──→ Upstream
//! ```
//!
//! # Design Decisions
//! - No JSON-RPC transformation on this path; frames relay as-is
//! - Close frames propagate in both directions; ping/pong pass through
//! - Upstream→client text frames go through the same key redaction as
//!   HTTP response bodies; client→upstream frames are untouched
//! - If the upstream dial fails the client socket is simply dropped;
//!   the upgrade response has already been sent at that point

use axum::extract::ws::{self, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::CloseFrame as TsCloseFrame;
use tokio_tungstenite::tungstenite::Message as TsMessage;

use crate::security::secrets;
use crate::upstream::Upstream;

/// Run the relay for one upgraded client connection until either side
/// closes or errors.
pub async fn relay(client: WebSocket, upstream: Upstream) {
    let url = upstream.ws_url().as_str();
    let upstream_ws = match tokio_tungstenite::connect_async(url).await {
        Ok((ws, _)) => ws,
        Err(err) => {
            tracing::error!(
                error = %secrets::redact_key(&err.to_string(), upstream.api_key()),
                "upstream websocket dial failed"
            );
            return;
        }
    };

    tracing::debug!("upstream websocket connected");

    let api_key = upstream.api_key().to_string();
    let (mut upstream_write, mut upstream_read) = upstream_ws.split();
    let (mut client_write, mut client_read) = client.split();

    // client -> upstream
    let uplink = async {
        while let Some(message) = client_read.next().await {
            let message = match message {
                Ok(message) => message,
                Err(_) => break,
            };
            let is_close = matches!(message, ws::Message::Close(_));
            if upstream_write.send(client_to_upstream(message)).await.is_err() {
                break;
            }
            if is_close {
                break;
            }
        }
        let _ = upstream_write.close().await;
    };

    // upstream -> client
    let downlink = async {
        while let Some(message) = upstream_read.next().await {
            let message = match message {
                Ok(message) => message,
                Err(_) => break,
            };
            let Some(converted) = upstream_to_client(message, &api_key) else {
                continue;
            };
            let is_close = matches!(converted, ws::Message::Close(_));
            if client_write.send(converted).await.is_err() {
                break;
            }
            if is_close {
                break;
            }
        }
        let _ = client_write.close().await;
    };

    // Either direction ending tears down the relay.
    tokio::select! {
        _ = uplink => {}
        _ = downlink => {}
    }

    tracing::debug!("websocket relay closed");
}

/// Convert a client frame into the upstream wire type, unchanged.
fn client_to_upstream(message: ws::Message) -> TsMessage {
    match message {
        ws::Message::Text(text) => TsMessage::Text(text.as_str().into()),
        ws::Message::Binary(data) => TsMessage::Binary(data),
        ws::Message::Ping(data) => TsMessage::Ping(data),
        ws::Message::Pong(data) => TsMessage::Pong(data),
        ws::Message::Close(frame) => TsMessage::Close(frame.map(|f| TsCloseFrame {
            code: f.code.into(),
            reason: f.reason.as_str().into(),
        })),
    }
}

/// Convert an upstream frame for the client, redacting the API key from
/// text payloads. Returns `None` for frames that have no client-side
/// equivalent (raw frames).
fn upstream_to_client(message: TsMessage, api_key: &str) -> Option<ws::Message> {
    match message {
        TsMessage::Text(text) => {
            let redacted = secrets::redact_key(text.as_str(), api_key);
            Some(ws::Message::Text(redacted.as_ref().into()))
        }
        TsMessage::Binary(data) => Some(ws::Message::Binary(data)),
        TsMessage::Ping(data) => Some(ws::Message::Ping(data)),
        TsMessage::Pong(data) => Some(ws::Message::Pong(data)),
        TsMessage::Close(frame) => Some(ws::Message::Close(frame.map(|f| ws::CloseFrame {
            code: f.code.into(),
            reason: f.reason.as_str().into(),
        }))),
        TsMessage::Frame(_) => None,
    }
}
