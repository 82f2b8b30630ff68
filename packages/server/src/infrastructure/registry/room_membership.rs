//! Room Membership Index
//!
//! Per-connection subscriptions to room channels. Not persisted: a new
//! connection starts with no rooms and clients re-join after reconnecting.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId};

#[derive(Default)]
struct MembershipState {
    by_room: HashMap<RoomId, HashSet<ConnectionId>>,
    by_connection: HashMap<ConnectionId, HashSet<RoomId>>,
}

#[derive(Default)]
pub struct RoomMembershipIndex {
    state: Mutex<MembershipState>,
}

impl RoomMembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to a room. Returns false if it already was.
    pub async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        let mut state = self.state.lock().await;
        state
            .by_room
            .entry(room_id)
            .or_default()
            .insert(connection_id);
        state
            .by_connection
            .entry(connection_id)
            .or_default()
            .insert(room_id)
    }

    /// Unsubscribe a connection from a room. Returns false if it was not joined.
    pub async fn leave(&self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        let mut state = self.state.lock().await;
        let removed = remove_from(&mut state.by_connection, &connection_id, &room_id);
        remove_from(&mut state.by_room, &room_id, &connection_id);
        removed
    }

    pub async fn connections_in_room(&self, room_id: RoomId) -> HashSet<ConnectionId> {
        let state = self.state.lock().await;
        state.by_room.get(&room_id).cloned().unwrap_or_default()
    }

    #[cfg(test)]
    pub async fn joined_rooms(&self, connection_id: ConnectionId) -> HashSet<RoomId> {
        let state = self.state.lock().await;
        state
            .by_connection
            .get(&connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop every membership of a closed connection. Returns the rooms it had joined.
    pub async fn purge(&self, connection_id: ConnectionId) -> HashSet<RoomId> {
        let mut state = self.state.lock().await;
        let rooms = state
            .by_connection
            .remove(&connection_id)
            .unwrap_or_default();
        for room_id in &rooms {
            remove_from(&mut state.by_room, room_id, &connection_id);
        }
        rooms
    }
}

/// Remove `value` from the set under `key`, dropping the set once empty.
fn remove_from<K, V>(map: &mut HashMap<K, HashSet<V>>, key: &K, value: &V) -> bool
where
    K: std::hash::Hash + Eq,
    V: std::hash::Hash + Eq,
{
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
