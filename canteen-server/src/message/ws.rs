//! WebSocket endpoint for live push
//!
//! Clients connect unauthenticated, then must send an `AUTH` frame carrying a
//! JWT before any pushes are delivered. Identity comes from the verified
//! token, never from a client-supplied user id.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::{ClientMessage, PushMessage};
use tokio::sync::mpsc;

use crate::auth::CurrentUser;
use crate::state::AppState;

/// GET /ws — upgrade to WebSocket
pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Pre-auth phase: wait for an AUTH frame, drop the connection on anything
    // else or on a bad token.
    let user: CurrentUser = loop {
        match ws_stream.next().await {
            Some(Ok(Message::Text(text))) => {
                let token = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Auth { token }) => token,
                    Err(_) => {
                        tracing::debug!("Unparseable pre-auth frame, closing");
                        let _ = ws_sink.close().await;
                        return;
                    }
                };
                match state.jwt.verify(&token) {
                    Ok(user) => break user,
                    Err(e) => {
                        tracing::debug!("WebSocket auth rejected: {e}");
                        let _ = ws_sink.close().await;
                        return;
                    }
                }
            }
            Some(Ok(Message::Ping(data))) => {
                let _ = ws_sink.send(Message::Pong(data)).await;
            }
            Some(Ok(Message::Close(_))) | None => return,
            Some(Err(e)) => {
                tracing::debug!("WebSocket error before auth: {e}");
                return;
            }
            _ => {} // Binary, Pong — ignore
        }
    };

    tracing::info!(user_id = user.id, role = %user.role, "WebSocket authenticated");

    let (msg_tx, mut msg_rx) = mpsc::channel::<PushMessage>(32);
    let conn_id = state.registry.register(user.id, msg_tx);

    // Acknowledge auth before any push frames
    if let Ok(json) = serde_json::to_string(&PushMessage::AuthSuccess) {
        if ws_sink.send(Message::Text(json.into())).await.is_err() {
            state.registry.unregister(user.id, conn_id);
            return;
        }
    }

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(user_id = user.id, "WebSocket disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(user_id = user.id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {} // Text after auth, Binary, Pong — ignore
                }
            }

            msg = msg_rx.recv() => {
                match msg {
                    Some(push) => {
                        match serde_json::to_string(&push) {
                            Ok(json) => {
                                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                                    tracing::warn!(user_id = user.id, "Failed to push frame, disconnecting");
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to encode push frame: {e}");
                            }
                        }
                    }
                    None => break, // channel closed
                }
            }
        }
    }

    let _ = ws_sink.close().await;
    state.registry.unregister(user.id, conn_id);
}
