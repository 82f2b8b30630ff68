//! UseCase: 受信者の解決
//!
//! ルームの参加者を受信者とする。参加者が記録されていないルームは
//! 全従業員宛て（全体チャンネル）として扱う。
//! 参加者の参照に失敗した場合は受信者なしとする（全従業員には広げない）。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RecipientResolver::resolve() メソッド
//! - 参加者あり、参加者なし、参照失敗時は受信者なし
//!
//! ### なぜこのテストが必要か
//! - フォールバック経路の配信先はこの結果で決まる
//! - 名簿の参照に失敗してもメッセージ送信自体は失敗させない
//! - 参照失敗で 1:1 メッセージが全従業員に広がらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者が記録されたルーム
//! - エッジケース：参加者なしのルーム（全従業員）
//! - 異常系：参加者の参照失敗、全従業員の参照失敗

use std::{collections::BTreeSet, sync::Arc};

use crate::domain::{EmployeeId, RoomId, RosterRepository};

pub struct RecipientResolver {
    roster: Arc<dyn RosterRepository>,
}

impl RecipientResolver {
    pub fn new(roster: Arc<dyn RosterRepository>) -> Self {
        Self { roster }
    }

    /// ルームの受信者を解決する
    ///
    /// # Returns
    ///
    /// 重複のない従業員 ID の集合。参照に失敗した場合は空になり得る。
    pub async fn resolve(&self, room_id: RoomId) -> BTreeSet<EmployeeId> {
        let participants = match self.roster.participants_of(room_id).await {
            Ok(participants) => participants,
            Err(e) => {
                tracing::warn!(
                    room_id = %room_id,
                    error = %e,
                    "participant lookup failed, no recipients resolved"
                );
                return BTreeSet::new();
            }
        };
        if !participants.is_empty() {
            return participants.into_iter().collect();
        }

        // 参加者なし: 全従業員
        match self.roster.all_employee_ids().await {
            Ok(employees) => {
                tracing::debug!(
                    room_id = %room_id,
                    recipients = employees.len(),
                    "room has no participants, broadcasting to roster"
                );
                employees.into_iter().collect()
            }
            Err(e) => {
                tracing::warn!(
                    room_id = %room_id,
                    error = %e,
                    "roster lookup failed, no fallback recipients"
                );
                BTreeSet::new()
            }
        }
    }
}
