//! In-memory room hub.
//!
//! Owns the membership table and the per-connection outbound channels
//! behind a single lock. Mutation, roster computation and enqueue happen
//! inside the same critical section: broadcasts to one room are observed
//! in issue order, and every roster push reflects exactly the joins and
//! leaves committed before it.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use irori_shared::time::get_jst_timestamp;

use crate::{
    domain::{
        ChatRecord, ConnectionId, Identity, MessageBody, OutboundChannel, RoomError, RoomHub,
        RoomName, RoomTable, Timestamp, Username,
    },
    infrastructure::dto::websocket::ServerEvent,
};

#[derive(Default)]
struct HubState {
    /// Membership table (the room registry)
    table: RoomTable,
    /// Outbound channel of every live connection
    senders: HashMap<ConnectionId, OutboundChannel>,
}

impl HubState {
    /// Fan a frame out to the given connections.
    ///
    /// A recipient whose channel is gone or closed is skipped with a
    /// warning; its cleanup belongs to the close handler, and one dead
    /// recipient never aborts delivery to the rest.
    fn fan_out(&self, targets: &[ConnectionId], payload: &str) {
        for conn in targets {
            let Some(sender) = self.senders.get(conn) else {
                tracing::warn!("Connection '{}' has no outbound channel, skipping", conn);
                continue;
            };
            if sender.send(payload.to_string()).is_err() {
                tracing::warn!("Failed to deliver frame to connection '{}'", conn);
            }
        }
    }

    /// Push the current roster to every member of the room
    fn push_roster(&self, room: &RoomName) {
        let users = self
            .table
            .roster(room)
            .into_iter()
            .map(Username::into_string)
            .collect();
        let frame = ServerEvent::UserList { users }.to_json();
        let targets = self.table.members(room);
        self.fan_out(&targets, &frame);
    }

    /// Announce a departure and refresh the roster for the remaining
    /// members
    fn announce_left(&self, room: &RoomName, username: &Username) {
        let frame = ServerEvent::UserLeft {
            username: username.to_string(),
        }
        .to_json();
        let targets = self.table.members(room);
        self.fan_out(&targets, &frame);
        self.push_roster(room);
    }
}

/// In-memory RoomHub implementation backed by `RoomTable`
pub struct InMemoryRoomHub {
    state: Mutex<HubState>,
}

impl InMemoryRoomHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HubState::default()),
        }
    }
}

impl Default for InMemoryRoomHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomHub for InMemoryRoomHub {
    async fn register(&self, conn: ConnectionId, sender: OutboundChannel) {
        let mut state = self.state.lock().await;
        state.senders.insert(conn, sender);
        tracing::debug!("Connection '{}' registered", conn);
    }

    async fn unregister(&self, conn: ConnectionId) {
        let mut state = self.state.lock().await;
        state.senders.remove(&conn);
        if let Some(membership) = state.table.leave(conn) {
            tracing::info!(
                "Connection '{}' ('{}') closed while in room '{}'",
                conn,
                membership.identity.username,
                membership.room
            );
            state.announce_left(&membership.room, &membership.identity.username);
        } else {
            tracing::debug!("Connection '{}' unregistered", conn);
        }
    }

    async fn join(
        &self,
        conn: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), RoomError> {
        let mut state = self.state.lock().await;
        let username = identity.username.clone();
        state.table.join(conn, room.clone(), identity)?;

        let frame = ServerEvent::UserJoined {
            username: username.to_string(),
        }
        .to_json();
        let targets = state.table.members(&room);
        state.fan_out(&targets, &frame);
        state.push_roster(&room);

        tracing::info!(
            "Connection '{}' joined room '{}' as '{}'",
            conn,
            room,
            username
        );
        Ok(())
    }

    async fn leave(&self, conn: ConnectionId) -> Option<RoomName> {
        let mut state = self.state.lock().await;
        let membership = state.table.leave(conn)?;
        tracing::info!(
            "Connection '{}' ('{}') left room '{}'",
            conn,
            membership.identity.username,
            membership.room
        );
        state.announce_left(&membership.room, &membership.identity.username);
        Some(membership.room)
    }

    async fn broadcast_message(
        &self,
        conn: ConnectionId,
        body: MessageBody,
    ) -> Result<ChatRecord, RoomError> {
        let state = self.state.lock().await;
        let membership = state.table.membership(conn).ok_or(RoomError::NotJoined)?;

        let record = ChatRecord::new(
            membership.room.clone(),
            membership.identity.username.clone(),
            membership.identity.user_id.clone(),
            body,
            Timestamp::new(get_jst_timestamp()),
        );

        let frame = ServerEvent::Message {
            username: record.username.to_string(),
            user_id: record.user_id.to_string(),
            message: record.body.to_string(),
        }
        .to_json();
        // The sender gets its own message echoed back, so every client
        // observes the room in the same order.
        let targets = state.table.members(&record.room);
        state.fan_out(&targets, &frame);

        Ok(record)
    }

    async fn broadcast_typing(&self, conn: ConnectionId, is_typing: bool) -> Result<(), RoomError> {
        let state = self.state.lock().await;
        let membership = state.table.membership(conn).ok_or(RoomError::NotJoined)?;
        let sender_user_id = membership.identity.user_id.clone();

        let frame = ServerEvent::Typing {
            typing: is_typing,
            username: membership.identity.username.to_string(),
        }
        .to_json();
        // Excluded by user id, not by channel: a second channel of the
        // same user does not see its own typing indicator either.
        let targets: Vec<ConnectionId> = state
            .table
            .members(&membership.room)
            .into_iter()
            .filter(|member| {
                state
                    .table
                    .membership(*member)
                    .is_none_or(|m| m.identity.user_id != sender_user_id)
            })
            .collect();
        state.fan_out(&targets, &frame);

        Ok(())
    }

    async fn push_to(&self, conn: ConnectionId, payload: &str) {
        let state = self.state.lock().await;
        state.fan_out(&[conn], payload);
    }

    async fn roster(&self, room: &RoomName) -> Vec<Username> {
        let state = self.state.lock().await;
        state.table.roster(room)
    }

    async fn room_summaries(&self) -> Vec<(RoomName, usize)> {
        let state = self.state.lock().await;
        state.table.room_summaries()
    }
}
