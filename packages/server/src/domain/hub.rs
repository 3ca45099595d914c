//! RoomHub trait 定義
//!
//! イベントルーターが必要とするルーム操作のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::{ChatRecord, Identity},
    error::RoomError,
    value_object::{ConnectionId, MessageBody, RoomName, Username},
};

/// Channel used to hand outbound frames to a connection's writer task
pub type OutboundChannel = UnboundedSender<String>;

/// Room hub: membership registry plus broadcast fan-out.
///
/// Implementations must make each operation atomic with respect to the
/// others: a roster pushed by `join` reflects exactly the memberships
/// committed before it, and two broadcasts issued one after the other
/// reach every common recipient in that order.
#[async_trait]
pub trait RoomHub: Send + Sync {
    /// Register a connection's outbound channel. Called once per socket,
    /// before any of its events are dispatched.
    async fn register(&self, conn: ConnectionId, sender: OutboundChannel);

    /// Drop a connection entirely. If it was joined to a room, the leave
    /// is performed and announced before this returns.
    async fn unregister(&self, conn: ConnectionId);

    /// Join a room, creating it on first use. Announces the join to every
    /// member and pushes the updated roster, both including the joiner.
    async fn join(
        &self,
        conn: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), RoomError>;

    /// Leave the current room, announcing it to the remaining members.
    /// Returns the room left, or `None` if the connection was not joined.
    async fn leave(&self, conn: ConnectionId) -> Option<RoomName>;

    /// Broadcast a chat message to every member of the sender's room,
    /// including the sender. Returns the stamped record for persistence.
    async fn broadcast_message(
        &self,
        conn: ConnectionId,
        body: MessageBody,
    ) -> Result<ChatRecord, RoomError>;

    /// Broadcast a typing indicator to the sender's room, excluding every
    /// connection that shares the sender's user id.
    async fn broadcast_typing(&self, conn: ConnectionId, is_typing: bool) -> Result<(), RoomError>;

    /// Best-effort send of one frame to one connection
    async fn push_to(&self, conn: ConnectionId, payload: &str);

    /// Display names currently in a room, in join order
    async fn roster(&self, room: &RoomName) -> Vec<Username>;

    /// Every room with its current occupant count, for the HTTP listing
    async fn room_summaries(&self) -> Vec<(RoomName, usize)>;
}
