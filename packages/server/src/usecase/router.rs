//! UseCase: 接続ごとのイベントディスパッチ
//!
//! Decodes one connection's inbound frames and drives the hub through the
//! two-state machine the protocol implies: a connection is either unjoined
//! or joined to exactly one room, `join` is the only event with meaning
//! before a room is entered, and a channel close behaves like a leave.
//! Chat messages are handed to the history store on a detached task so
//! persistence never sits on the delivery path.
//!
//! Decode policy:
//! - an undecodable frame earns exactly one `error` reply to its sender;
//! - a well-formed frame with an unknown `type` is logged and dropped;
//! - room-scoped events from an unjoined connection are ignored.

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, HistoryStore, Identity, MessageBody, RoomHub, RoomName, UserId, Username,
        ValueObjectError,
    },
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
};

/// Routes one connection's inbound events to the hub and history store
pub struct EventRouter {
    /// Hub（ルーム操作の抽象化）
    hub: Arc<dyn RoomHub>,
    /// HistoryStore（メッセージ永続化の抽象化）
    history: Arc<dyn HistoryStore>,
}

impl EventRouter {
    /// Create a new EventRouter
    pub fn new(hub: Arc<dyn RoomHub>, history: Arc<dyn HistoryStore>) -> Self {
        Self { hub, history }
    }

    /// Handle one inbound text frame from `conn`
    pub async fn handle_text(&self, conn: ConnectionId, text: &str) {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Undecodable frame from '{}': {}", conn, e);
                self.send_error(conn, "Invalid message format").await;
                return;
            }
        };

        let Some(event_type) = value
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_owned)
        else {
            tracing::warn!("Frame without event type from '{}'", conn);
            self.send_error(conn, "Invalid message format").await;
            return;
        };

        if !ClientEvent::KNOWN_TYPES.contains(&event_type.as_str()) {
            // Unknown types are dropped without a reply.
            tracing::warn!("Unknown event type '{}' from '{}'", event_type, conn);
            return;
        }

        let event = match serde_json::from_value::<ClientEvent>(value) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Malformed '{}' event from '{}': {}", event_type, conn, e);
                self.send_error(conn, "Invalid message format").await;
                return;
            }
        };

        match event {
            ClientEvent::Join {
                room,
                username,
                user_id,
            } => self.handle_join(conn, room, username, user_id).await,
            ClientEvent::Leave => self.handle_leave(conn).await,
            ClientEvent::Message { message } => self.handle_message(conn, message).await,
            ClientEvent::Typing { is_typing } => self.handle_typing(conn, is_typing).await,
        }
    }

    /// Handle the connection's channel closing.
    ///
    /// Runs before the socket handler returns, so no later event for
    /// `conn` can observe stale membership.
    pub async fn handle_close(&self, conn: ConnectionId) {
        self.hub.unregister(conn).await;
    }

    async fn handle_join(&self, conn: ConnectionId, room: String, username: String, user_id: String) {
        let (room, identity) = match Self::validate_join(room, username, user_id) {
            Ok(validated) => validated,
            Err(e) => {
                tracing::warn!("Rejected join from '{}': {}", conn, e);
                self.send_error(conn, &e.to_string()).await;
                return;
            }
        };

        if let Err(e) = self.hub.join(conn, room, identity).await {
            tracing::warn!("Rejected join from '{}': {}", conn, e);
            self.send_error(conn, &e.to_string()).await;
        }
    }

    fn validate_join(
        room: String,
        username: String,
        user_id: String,
    ) -> Result<(RoomName, Identity), ValueObjectError> {
        let room = RoomName::new(room)?;
        let username = Username::new(username)?;
        let user_id = UserId::new(user_id)?;
        Ok((room, Identity::new(username, user_id)))
    }

    async fn handle_leave(&self, conn: ConnectionId) {
        if self.hub.leave(conn).await.is_none() {
            tracing::debug!("Ignoring leave from unjoined connection '{}'", conn);
        }
    }

    async fn handle_message(&self, conn: ConnectionId, message: String) {
        let body = match MessageBody::new(message) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Rejected message from '{}': {}", conn, e);
                self.send_error(conn, &e.to_string()).await;
                return;
            }
        };

        match self.hub.broadcast_message(conn, body).await {
            Ok(record) => {
                // Fire and forget: delivery is already done, the store
                // catches up on its own time.
                let history = Arc::clone(&self.history);
                tokio::spawn(async move {
                    if let Err(e) = history.append(record).await {
                        tracing::warn!("Failed to persist message: {}", e);
                    }
                });
            }
            Err(e) => {
                tracing::debug!("Ignoring message from connection '{}': {}", conn, e);
            }
        }
    }

    async fn handle_typing(&self, conn: ConnectionId, is_typing: bool) {
        if let Err(e) = self.hub.broadcast_typing(conn, is_typing).await {
            tracing::debug!("Ignoring typing from connection '{}': {}", conn, e);
        }
    }

    async fn send_error(&self, conn: ConnectionId, message: &str) {
        let frame = ServerEvent::Error {
            message: message.to_string(),
        }
        .to_json();
        self.hub.push_to(conn, &frame).await;
    }
}
