//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use clinic_core::error::AppError;
use clinic_realtime::{AuthenticatedConnection, InboundMessage, OutboundMessage, authenticate_socket};

use crate::state::AppState;

/// Query string of the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: Option<String>,
}

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, AppError> {
    let auth = authenticate_socket(&state.jwt_decoder, query.token.as_deref()).await?;

    Ok(ws.on_upgrade(move |socket| handle_connection(state, auth, socket)))
}

/// Reply to one client frame, if it warrants one.
fn reply_to(text: &str) -> Option<OutboundMessage> {
    match serde_json::from_str::<InboundMessage>(text) {
        Ok(InboundMessage::Ping { timestamp }) => Some(OutboundMessage::Pong { timestamp }),
        Err(e) => Some(OutboundMessage::Error {
            code: "INVALID_MESSAGE".to_string(),
            message: format!("Unrecognised message: {e}"),
        }),
    }
}

async fn handle_connection(state: AppState, auth: AuthenticatedConnection, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subscription = state.realtime.connect(auth.user_id, auth.role).await;

    info!(user_id = %auth.user_id, role = %auth.role, "WebSocket connection established");

    let hello = OutboundMessage::Connected {
        user_id: auth.user_id,
        channels: subscription.channels.clone(),
    };
    if ws_tx.send(Message::Text(hello.to_json().into())).await.is_err() {
        return;
    }

    let (reply_tx, mut reply_rx) = mpsc::channel::<OutboundMessage>(16);

    let outbound = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                Some(msg) = subscription.recv() => msg,
                Some(msg) = reply_rx.recv() => msg,
                else => break,
            };
            if ws_tx.send(Message::Text(msg.to_json().into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(reply) = reply_to(text.as_str()) {
                    if reply_tx.send(reply).await.is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(user_id = %auth.user_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound.abort();
    let pruned = state.realtime.prune().await;
    debug!(pruned, "Pruned idle realtime channels");
    info!(user_id = %auth.user_id, "WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_gets_pong() {
        match reply_to(r#"{"type":"ping","timestamp":42}"#) {
            Some(OutboundMessage::Pong { timestamp }) => assert_eq!(timestamp, 42),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_gets_error() {
        assert!(matches!(
            reply_to("hello"),
            Some(OutboundMessage::Error { .. })
        ));
    }
}
