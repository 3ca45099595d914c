//! Connection-to-room membership table.

use std::collections::HashMap;

use super::{
    entity::{Identity, Membership},
    error::RoomError,
    value_object::{ConnectionId, RoomName, Username},
};

/// Tracks which connections belong to which room.
///
/// Rooms are created on first join and never deleted; an empty room is
/// simply a room with an empty member list, so the table grows with the
/// number of distinct room names ever used. Member lists keep join order,
/// which is the order rosters are reported in.
///
/// The table is a plain single-threaded structure. The hub wraps it in a
/// lock and serializes every mutation and every snapshot taken for a
/// broadcast.
///
/// Invariant: a connection appears in a room's member list if and only if
/// its membership names that room.
#[derive(Debug, Default)]
pub struct RoomTable {
    /// Membership of every currently joined connection
    memberships: HashMap<ConnectionId, Membership>,
    /// Member lists per room, in join order
    rooms: HashMap<RoomName, Vec<ConnectionId>>,
}

impl RoomTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a connection to a room, creating the room on first use.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::AlreadyJoinedElsewhere` if the connection
    /// already holds a membership. Changing rooms or display names
    /// requires an explicit leave first.
    pub fn join(
        &mut self,
        conn: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.memberships.get(&conn) {
            return Err(RoomError::AlreadyJoinedElsewhere {
                current: current.room.clone(),
            });
        }
        self.rooms.entry(room.clone()).or_default().push(conn);
        self.memberships.insert(conn, Membership::new(room, identity));
        Ok(())
    }

    /// Remove a connection from its current room.
    ///
    /// Returns the membership it held, or `None` if the connection was not
    /// joined anywhere (leaving while unjoined is not an error). The room
    /// entry itself stays, even when it becomes empty.
    pub fn leave(&mut self, conn: ConnectionId) -> Option<Membership> {
        let membership = self.memberships.remove(&conn)?;
        if let Some(members) = self.rooms.get_mut(&membership.room) {
            members.retain(|c| *c != conn);
        }
        Some(membership)
    }

    /// Current membership of a connection, if any
    pub fn membership(&self, conn: ConnectionId) -> Option<&Membership> {
        self.memberships.get(&conn)
    }

    /// Snapshot of a room's members in join order; empty for unknown rooms
    pub fn members(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.rooms.get(room).cloned().unwrap_or_default()
    }

    /// Display names of a room's members, in join order
    pub fn roster(&self, room: &RoomName) -> Vec<Username> {
        self.rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|conn| self.memberships.get(conn))
                    .map(|m| m.identity.username.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every room ever created with its current occupant count, sorted by
    /// name
    pub fn room_summaries(&self) -> Vec<(RoomName, usize)> {
        let mut summaries: Vec<(RoomName, usize)> = self
            .rooms
            .iter()
            .map(|(name, members)| (name.clone(), members.len()))
            .collect();
        summaries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::UserId;

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn identity(name: &str, user_id: &str) -> Identity {
        Identity::new(
            Username::new(name.to_string()).unwrap(),
            UserId::new(user_id.to_string()).unwrap(),
        )
    }

    #[test]
    fn test_join_creates_room_on_first_use() {
        // テスト項目: 初めてのルーム名への参加でルームが作成される
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn = ConnectionId::new();

        // when (操作):
        let result = table.join(conn, room("lobby"), identity("alice", "uid1"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(table.members(&room("lobby")), vec![conn]);
        assert_eq!(table.membership(conn).unwrap().room, room("lobby"));
    }

    #[test]
    fn test_join_while_joined_fails() {
        // テスト項目: 参加中の接続は別のルームに参加できない
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn = ConnectionId::new();
        table
            .join(conn, room("lobby"), identity("alice", "uid1"))
            .unwrap();

        // when (操作):
        let result = table.join(conn, room("other"), identity("alice", "uid1"));

        // then (期待する結果): 元の membership が保持される
        assert_eq!(
            result.unwrap_err(),
            RoomError::AlreadyJoinedElsewhere {
                current: room("lobby")
            }
        );
        assert_eq!(table.membership(conn).unwrap().room, room("lobby"));
        assert!(table.members(&room("other")).is_empty());
    }

    #[test]
    fn test_rejoin_same_room_also_fails() {
        // テスト項目: 同じルームへの再参加も拒否される（leave してから join する）
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn = ConnectionId::new();
        table
            .join(conn, room("lobby"), identity("alice", "uid1"))
            .unwrap();

        // when (操作):
        let result = table.join(conn, room("lobby"), identity("alice2", "uid1"));

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(table.members(&room("lobby")).len(), 1);
        assert_eq!(
            table.membership(conn).unwrap().identity.username.as_str(),
            "alice"
        );
    }

    #[test]
    fn test_leave_removes_membership() {
        // テスト項目: leave で membership とメンバーリストの両方から削除される
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn_a = ConnectionId::new();
        let conn_b = ConnectionId::new();
        table
            .join(conn_a, room("lobby"), identity("alice", "uid1"))
            .unwrap();
        table
            .join(conn_b, room("lobby"), identity("bob", "uid2"))
            .unwrap();

        // when (操作):
        let membership = table.leave(conn_a);

        // then (期待する結果):
        assert_eq!(membership.unwrap().room, room("lobby"));
        assert!(table.membership(conn_a).is_none());
        assert_eq!(table.members(&room("lobby")), vec![conn_b]);
    }

    #[test]
    fn test_leave_while_unjoined_is_noop() {
        // テスト項目: 未参加の接続の leave は no-op（エラーにならない）
        // given (前提条件):
        let mut table = RoomTable::new();

        // when (操作):
        let membership = table.leave(ConnectionId::new());

        // then (期待する結果):
        assert!(membership.is_none());
    }

    #[test]
    fn test_empty_room_is_kept() {
        // テスト項目: 空になったルームは削除されない
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn = ConnectionId::new();
        table
            .join(conn, room("lobby"), identity("alice", "uid1"))
            .unwrap();
        table.leave(conn);

        // when (操作):
        let summaries = table.room_summaries();

        // then (期待する結果):
        assert_eq!(summaries, vec![(room("lobby"), 0)]);
    }

    #[test]
    fn test_members_of_unknown_room_is_empty() {
        // テスト項目: 未知のルームのメンバーは空のスナップショット
        // given (前提条件):
        let table = RoomTable::new();

        // then (期待する結果):
        assert!(table.members(&room("nowhere")).is_empty());
        assert!(table.roster(&room("nowhere")).is_empty());
    }

    #[test]
    fn test_roster_keeps_join_order() {
        // テスト項目: roster は参加順を保持する
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn_c = ConnectionId::new();
        let conn_a = ConnectionId::new();
        let conn_b = ConnectionId::new();
        table
            .join(conn_c, room("lobby"), identity("charlie", "uid3"))
            .unwrap();
        table
            .join(conn_a, room("lobby"), identity("alice", "uid1"))
            .unwrap();
        table
            .join(conn_b, room("lobby"), identity("bob", "uid2"))
            .unwrap();

        // when (操作):
        let roster: Vec<String> = table
            .roster(&room("lobby"))
            .into_iter()
            .map(Username::into_string)
            .collect();

        // then (期待する結果): ソートではなく参加順
        assert_eq!(roster, vec!["charlie", "alice", "bob"]);
    }

    #[test]
    fn test_rooms_are_isolated() {
        // テスト項目: ルームごとにメンバーが分離される
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn_a = ConnectionId::new();
        let conn_b = ConnectionId::new();
        table
            .join(conn_a, room("chatroom1"), identity("alice", "uid1"))
            .unwrap();
        table
            .join(conn_b, room("chatroom2"), identity("bob", "uid2"))
            .unwrap();

        // then (期待する結果):
        assert_eq!(table.members(&room("chatroom1")), vec![conn_a]);
        assert_eq!(table.members(&room("chatroom2")), vec![conn_b]);
    }

    #[test]
    fn test_same_user_id_on_two_connections() {
        // テスト項目: 同じ userId の2接続は独立した roster エントリになる
        // given (前提条件):
        let mut table = RoomTable::new();
        let conn_a = ConnectionId::new();
        let conn_b = ConnectionId::new();

        // when (操作):
        table
            .join(conn_a, room("lobby"), identity("alice", "uid1"))
            .unwrap();
        table
            .join(conn_b, room("lobby"), identity("alice", "uid1"))
            .unwrap();

        // then (期待する結果):
        assert_eq!(table.members(&room("lobby")).len(), 2);
        assert_eq!(table.roster(&room("lobby")).len(), 2);
    }
}
