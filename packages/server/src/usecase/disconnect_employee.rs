//! UseCase: 従業員切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectEmployeeUseCase::execute() メソッド
//! - 登録解除、ルーム参加の一括解除、offline プレゼンス
//!
//! ### なぜこのテストが必要か
//! - offline は最後の接続が切れたときだけ通知されることを保証
//! - 切断後にルームへの配信対象から外れることを確認
//! - ハンドラーと退去ループの両方から呼ばれても二重に通知しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：唯一の接続の切断
//! - エッジケース：複数接続のうち 1 本の切断
//! - 異常系：既に削除済みの接続
//! - 競合：切断中の再接続、切断と並行したルーム参加

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, PresenceEvent},
    infrastructure::registry::{ConnectionRegistry, RoomMembershipIndex, Unregistered},
};

use super::{broadcast_presence::PresenceBroadcaster, error::DisconnectError};

/// 従業員切断のユースケース
pub struct DisconnectEmployeeUseCase {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomMembershipIndex>,
    presence: PresenceBroadcaster,
}

impl DisconnectEmployeeUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>, rooms: Arc<RoomMembershipIndex>) -> Self {
        Self {
            presence: PresenceBroadcaster::new(registry.clone()),
            registry,
            rooms,
        }
    }

    /// 従業員切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Unregistered)` - 削除した接続と、それが最後の接続だったか
    /// * `Err(DisconnectError::UnknownConnection)` - 既に削除済み
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
    ) -> Result<Unregistered, DisconnectError> {
        // offline の判定から通知まで、同じ従業員の online と順序が入れ替わらない
        let _transition = self.registry.presence_transition().await;

        // 1. 登録解除（以降のルーム参加は JoinRoomUseCase が取り消す）
        let removed = self.registry.unregister(connection_id).await;

        // 2. ルーム参加を解除（登録済みかどうかに関係なく残骸を消す）
        let left = self.rooms.purge(connection_id).await;

        let removed = removed.ok_or(DisconnectError::UnknownConnection(connection_id))?;

        let employee_id = removed.connection.employee_id;
        tracing::info!(
            connection_id = %connection_id,
            employee_id = %employee_id,
            rooms_left = left.len(),
            was_last = removed.was_last,
            "employee disconnected"
        );

        // 3. 最後の接続なら offline を通知
        if removed.was_last {
            self.presence
                .broadcast(PresenceEvent::offline(employee_id))
                .await;
        }

        Ok(removed)
    }
}
