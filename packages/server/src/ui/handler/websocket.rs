//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{domain::ConnectionId, ui::state::AppState, usecase::EventRouter};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn = ConnectionId::new();
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive broadcast frames
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.hub.register(conn, tx).await;
    tracing::info!("Connection '{}' established", conn);

    let router = Arc::new(EventRouter::new(state.hub.clone(), state.history.clone()));

    // Spawn a task to receive frames from this client
    let recv_router = Arc::clone(&router);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", conn, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    recv_router.handle_text(conn, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping from '{}'", conn);
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", conn);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward broadcast frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove the connection from the hub; announces the leave and pushes
    // the roster if it was in a room. Runs before the handler returns so
    // no later event can observe the stale membership.
    router.handle_close(conn).await;
    tracing::info!("Connection '{}' closed", conn);
}
