//! Shared server state.

use std::sync::Arc;

use crate::domain::{HistoryStore, RoomHub};

/// Shared application state
pub struct AppState {
    /// Hub（ルーム操作の抽象化）
    pub hub: Arc<dyn RoomHub>,
    /// HistoryStore（メッセージ永続化の抽象化）
    pub history: Arc<dyn HistoryStore>,
}
