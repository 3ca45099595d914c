//! HistoryStore trait 定義
//!
//! ドメイン層が必要とするメッセージ永続化のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{ChatRecord, StoredMessage},
    error::HistoryError,
    value_object::RoomName,
};

/// Durable, append-only log of chat messages per room.
///
/// Writes happen off the delivery path: the router hands records over on
/// a detached task, and a failed write is logged without ever reaching a
/// client. Reads serve the history endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append one message record. Called once per successful broadcast.
    async fn append(&self, record: ChatRecord) -> Result<(), HistoryError>;

    /// The most recent `limit` messages for `room`, oldest first
    async fn query(
        &self,
        room: RoomName,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, HistoryError>;
}
