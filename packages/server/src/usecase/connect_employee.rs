//! UseCase: 従業員接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectEmployeeUseCase::execute() メソッド
//! - 接続の登録と online プレゼンスの通知
//!
//! ### なぜこのテストが必要か
//! - 接続ごとに online がちょうど 1 回通知されることを保証
//! - 同じ従業員の 2 本目の接続も登録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - エッジケース：同じ従業員が別の種類の接続を追加する

use std::sync::Arc;

use crate::{
    domain::{Connection, EmployeeId, PresenceEvent, TransportAdapter},
    infrastructure::registry::ConnectionRegistry,
};

use super::broadcast_presence::PresenceBroadcaster;

/// 従業員接続のユースケース
pub struct ConnectEmployeeUseCase {
    registry: Arc<ConnectionRegistry>,
    presence: PresenceBroadcaster,
}

impl ConnectEmployeeUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            presence: PresenceBroadcaster::new(registry.clone()),
            registry,
        }
    }

    /// 従業員接続を実行
    ///
    /// # Arguments
    ///
    /// * `employee_id` - 認証済みの従業員 ID
    /// * `adapter` - この接続への書き込み口
    ///
    /// # Returns
    ///
    /// 登録された接続
    pub async fn execute(
        &self,
        employee_id: EmployeeId,
        adapter: Arc<dyn TransportAdapter>,
    ) -> Connection {
        let _transition = self.registry.presence_transition().await;

        // 1. 登録（従業員ごとのフォールバックグループにも入る）
        let connection = self.registry.register(employee_id, adapter).await;

        tracing::info!(
            connection_id = %connection.id,
            employee_id = %employee_id,
            transport = %connection.transport_kind,
            "employee connected"
        );

        // 2. online を全接続に通知（新しい接続自身も含む）
        self.presence
            .broadcast(PresenceEvent::online(employee_id))
            .await;

        connection
    }
}
