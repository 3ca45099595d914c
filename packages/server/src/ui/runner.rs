//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{HistoryStore, RoomHub},
    infrastructure::{history::SqliteHistoryStore, hub::InMemoryRoomHub},
};

use super::{
    handler::{get_room_messages, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Run the chat relay server
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 3001)
/// * `database_url` - SQLite URL for the message history
///   (e.g., "sqlite://chat.db?mode=rwc")
pub async fn run_server(
    host: String,
    port: u16,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Create shared state
    let hub: Arc<dyn RoomHub> = Arc::new(InMemoryRoomHub::new());
    let history: Arc<dyn HistoryStore> = Arc::new(SqliteHistoryStore::connect(database_url).await?);
    let app_state = Arc::new(AppState { hub, history });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/messages/{room}", get(get_room_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Chat relay listening on {}", listener.local_addr()?);
    tracing::info!("Connect to: ws://{}/ws", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    // Set up graceful shutdown signal handler
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
