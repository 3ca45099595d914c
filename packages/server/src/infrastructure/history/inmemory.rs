//! In-memory history store for tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatRecord, HistoryError, HistoryStore, RoomName, StoredMessage};

/// History store keeping everything in a Vec. Test double for the SQLite
/// store; ids are assigned in append order starting at 1.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: Mutex<Vec<StoredMessage>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended so far
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether nothing has been appended yet
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, record: ChatRecord) -> Result<(), HistoryError> {
        let mut records = self.records.lock().await;
        let id = records.len() as i64 + 1;
        records.push(StoredMessage::new(id, record));
        Ok(())
    }

    async fn query(
        &self,
        room: RoomName,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, HistoryError> {
        let records = self.records.lock().await;
        let mut matching: Vec<StoredMessage> = records
            .iter()
            .filter(|message| message.room == room)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit);
        Ok(matching.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, Timestamp, UserId, Username};

    fn record(room: &str, body: &str, timestamp: i64) -> ChatRecord {
        ChatRecord::new(
            RoomName::new(room.to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            UserId::new("uid1".to_string()).unwrap(),
            MessageBody::new(body.to_string()).unwrap(),
            Timestamp::new(timestamp),
        )
    }

    #[tokio::test]
    async fn test_append_assigns_sequential_ids() {
        // テスト項目: append で id が 1 から順に割り当てられる
        // given (前提条件):
        let store = InMemoryHistoryStore::new();

        // when (操作):
        store.append(record("lobby", "one", 1000)).await.unwrap();
        store.append(record("lobby", "two", 2000)).await.unwrap();

        // then (期待する結果):
        let messages = store
            .query(RoomName::new("lobby".to_string()).unwrap(), 50)
            .await
            .unwrap();
        assert_eq!(messages[0].id, 1);
        assert_eq!(messages[1].id, 2);
    }

    #[tokio::test]
    async fn test_query_respects_limit_and_order() {
        // テスト項目: limit 超過時は最新の limit 件が古い順で返される
        // given (前提条件):
        let store = InMemoryHistoryStore::new();
        for i in 0..4 {
            store
                .append(record("lobby", &format!("msg{}", i), 1000 + i))
                .await
                .unwrap();
        }

        // when (操作):
        let messages = store
            .query(RoomName::new("lobby".to_string()).unwrap(), 2)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body.as_str(), "msg2");
        assert_eq!(messages[1].body.as_str(), "msg3");
    }
}
