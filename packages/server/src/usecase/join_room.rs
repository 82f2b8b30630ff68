//! UseCase: ルーム参加
//!
//! 登録済みの接続だけがルームに参加できる。切断は登録解除の後にルーム参加を
//! 一括解除するため、参加後にもう一度登録を確かめる。

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::registry::{ConnectionRegistry, RoomMembershipIndex},
};

use super::error::MembershipError;

pub struct JoinRoomUseCase {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomMembershipIndex>,
}

impl JoinRoomUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>, rooms: Arc<RoomMembershipIndex>) -> Self {
        Self { registry, rooms }
    }

    /// 参加済みでも成功する（冪等）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> Result<(), MembershipError> {
        if !self.registry.contains(connection_id).await {
            return Err(MembershipError::UnknownConnection(connection_id));
        }

        let added = self.rooms.join(connection_id, room_id).await;

        // 並行した切断が登録解除を済ませていたら、purge の後に入った参加を取り消す
        if !self.registry.contains(connection_id).await {
            self.rooms.leave(connection_id, room_id).await;
            return Err(MembershipError::UnknownConnection(connection_id));
        }
        tracing::debug!(
            connection_id = %connection_id,
            room_id = %room_id,
            added,
            "joined room"
        );
        Ok(())
    }
}
