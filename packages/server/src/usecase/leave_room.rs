//! UseCase: ルーム退出

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::registry::RoomMembershipIndex,
};

pub struct LeaveRoomUseCase {
    rooms: Arc<RoomMembershipIndex>,
}

impl LeaveRoomUseCase {
    pub fn new(rooms: Arc<RoomMembershipIndex>) -> Self {
        Self { rooms }
    }

    /// 参加していなくても成功する（冪等）
    ///
    /// # Returns
    ///
    /// 参加していた場合は true
    pub async fn execute(&self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        let removed = self.rooms.leave(connection_id, room_id).await;
        tracing::debug!(
            connection_id = %connection_id,
            room_id = %room_id,
            removed,
            "left room"
        );
        removed
    }
}
