//! SQLite-backed history store.

use async_trait::async_trait;
use sqlx::{
    Row,
    sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow},
};

use crate::domain::{
    ChatRecord, HistoryError, HistoryStore, MessageBody, RoomName, StoredMessage, Timestamp,
    UserId, Username,
};

/// Durable message log backed by SQLite
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Open (or create) the database behind `database_url` and ensure the
    /// schema exists.
    ///
    /// The pool is capped at a single connection: SQLite serializes
    /// writers anyway, and a larger pool would hand every connection of a
    /// `sqlite::memory:` URL its own empty database.
    pub async fn connect(database_url: &str) -> Result<Self, HistoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| HistoryError::Unavailable(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                room TEXT NOT NULL,
                username TEXT NOT NULL,
                user_id TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| HistoryError::Unavailable(e.to_string()))?;

        tracing::info!("History store ready at '{}'", database_url);
        Ok(Self { pool })
    }
}

fn text_column(row: &SqliteRow, name: &str) -> Result<String, HistoryError> {
    row.try_get(name)
        .map_err(|e| HistoryError::InvalidRecord(format!("{}: {}", name, e)))
}

fn int_column(row: &SqliteRow, name: &str) -> Result<i64, HistoryError> {
    row.try_get(name)
        .map_err(|e| HistoryError::InvalidRecord(format!("{}: {}", name, e)))
}

fn message_from_row(row: &SqliteRow) -> Result<StoredMessage, HistoryError> {
    Ok(StoredMessage {
        id: int_column(row, "id")?,
        room: RoomName::new(text_column(row, "room")?)?,
        username: Username::new(text_column(row, "username")?)?,
        user_id: UserId::new(text_column(row, "user_id")?)?,
        body: MessageBody::new(text_column(row, "message")?)?,
        timestamp: Timestamp::new(int_column(row, "timestamp")?),
    })
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, record: ChatRecord) -> Result<(), HistoryError> {
        sqlx::query(
            "INSERT INTO messages (room, username, user_id, message, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(record.room.as_str())
        .bind(record.username.as_str())
        .bind(record.user_id.as_str())
        .bind(record.body.as_str())
        .bind(record.timestamp.value())
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn query(
        &self,
        room: RoomName,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, HistoryError> {
        // Newest rows first, then reversed, so the client receives the
        // last `limit` messages in chronological order.
        let rows = sqlx::query(
            "SELECT id, room, username, user_id, message, timestamp
             FROM messages
             WHERE room = ?1
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2",
        )
        .bind(room.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(e.to_string()))?;

        let mut messages = rows
            .iter()
            .map(message_from_row)
            .collect::<Result<Vec<StoredMessage>, HistoryError>>()?;
        messages.reverse();
        Ok(messages)
    }
}
