//! HTTP API response DTOs for the chat relay.

use serde::{Deserialize, Serialize};

/// One persisted chat message as returned by the history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecordDto {
    pub id: i64,
    pub room: String,
    pub username: String,
    pub user_id: String,
    pub message: String,
    pub timestamp: String, // ISO 8601
}

/// Room summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub occupants: usize,
}
