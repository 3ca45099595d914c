//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use irori_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{MessageRecordDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Number of messages returned by the history endpoint
const HISTORY_LIMIT: usize = 50;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms with current occupant counts
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state
        .hub
        .room_summaries()
        .await
        .into_iter()
        .map(|(name, occupants)| RoomSummaryDto {
            name: name.into_string(),
            occupants,
        })
        .collect();

    Json(summaries)
}

/// Get the most recent messages of a room, oldest first
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<Vec<MessageRecordDto>>, StatusCode> {
    let room = match RoomName::new(room) {
        Ok(room) => room,
        Err(e) => {
            tracing::warn!("Rejected history request: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let messages = state.history.query(room, HISTORY_LIMIT).await.map_err(|e| {
        tracing::error!("History query failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let records = messages
        .into_iter()
        .map(|message| MessageRecordDto {
            id: message.id,
            room: message.room.into_string(),
            username: message.username.into_string(),
            user_id: message.user_id.into_string(),
            message: message.body.into_string(),
            timestamp: timestamp_to_jst_rfc3339(message.timestamp.value()),
        })
        .collect();

    Ok(Json(records))
}
