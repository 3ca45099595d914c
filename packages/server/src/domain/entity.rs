//! Core domain models for the chat relay.

use super::value_object::{MessageBody, RoomName, Timestamp, UserId, Username};

/// Transient identity of a connection, set at join and cleared at leave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name shown in rosters and announcements
    pub username: Username,
    /// Opaque client-supplied user identifier
    pub user_id: UserId,
}

impl Identity {
    /// Create a new identity
    pub fn new(username: Username, user_id: UserId) -> Self {
        Self { username, user_id }
    }
}

/// A connection's membership in a room.
///
/// A connection holds at most one membership at a time; holding none means
/// the connection is unjoined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// The room this connection currently belongs to
    pub room: RoomName,
    /// Identity the connection joined under
    pub identity: Identity,
}

impl Membership {
    /// Create a new membership
    pub fn new(room: RoomName, identity: Identity) -> Self {
        Self { room, identity }
    }
}

/// One chat message as produced by a successful broadcast.
///
/// Not retained in memory after the broadcast; the history store keeps
/// the durable copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub room: RoomName,
    pub username: Username,
    pub user_id: UserId,
    pub body: MessageBody,
    /// Server-assigned at broadcast time
    pub timestamp: Timestamp,
}

impl ChatRecord {
    /// Create a new chat record
    pub fn new(
        room: RoomName,
        username: Username,
        user_id: UserId,
        body: MessageBody,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            room,
            username,
            user_id,
            body,
            timestamp,
        }
    }
}

/// One persisted chat message as returned by the history store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Auto-incrementing store identifier
    pub id: i64,
    pub room: RoomName,
    pub username: Username,
    pub user_id: UserId,
    pub body: MessageBody,
    pub timestamp: Timestamp,
}

impl StoredMessage {
    /// Build a stored message from a chat record and its assigned id
    pub fn new(id: i64, record: ChatRecord) -> Self {
        Self {
            id,
            room: record.room,
            username: record.username,
            user_id: record.user_id,
            body: record.body,
            timestamp: record.timestamp,
        }
    }
}
