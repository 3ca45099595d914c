//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::RoomName;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// MessageBody validation error
    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Errors related to room membership
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// The connection already holds a membership; it must leave first
    #[error("already joined room '{current}'")]
    AlreadyJoinedElsewhere { current: RoomName },

    /// The operation needs a room context and the connection has none
    #[error("not joined to any room")]
    NotJoined,
}

/// Errors from the history store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The store could not be opened or initialized
    #[error("history store unavailable: {0}")]
    Unavailable(String),

    /// An append failed
    #[error("history write failed: {0}")]
    WriteFailed(String),

    /// A query failed
    #[error("history query failed: {0}")]
    QueryFailed(String),

    /// A persisted row no longer satisfies domain validation
    #[error("corrupt history record: {0}")]
    InvalidRecord(String),
}

impl From<ValueObjectError> for HistoryError {
    fn from(e: ValueObjectError) -> Self {
        HistoryError::InvalidRecord(e.to_string())
    }
}
