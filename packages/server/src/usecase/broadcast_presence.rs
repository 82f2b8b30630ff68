//! UseCase: プレゼンス通知
//!
//! 従業員の online/offline をすべての接続に送る（ルームとは無関係）。
//! ack は待たない。

use std::sync::Arc;

use crate::{
    domain::PresenceEvent,
    infrastructure::{
        dto::websocket::{event, presence_payload},
        registry::ConnectionRegistry,
    },
};

pub struct PresenceBroadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl PresenceBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// `presence:update` に続けて `staff:online` / `staff:offline` を送る
    ///
    /// # Returns
    ///
    /// 送信できた接続数
    pub async fn broadcast(&self, presence: PresenceEvent) -> usize {
        let payload = presence_payload(presence);
        let transition = if presence.online {
            event::STAFF_ONLINE
        } else {
            event::STAFF_OFFLINE
        };

        let mut reached = 0;
        for handle in self.registry.all().await {
            let sent = [event::PRESENCE_UPDATE, transition]
                .into_iter()
                .try_for_each(|name| handle.adapter.send(name, &payload));
            match sent {
                Ok(()) => reached += 1,
                Err(_) => self
                    .registry
                    .report_failure(handle.connection.id, handle.connection.transport_kind),
            }
        }

        tracing::info!(
            employee_id = %presence.employee_id,
            online = presence.online,
            reached,
            "broadcasted presence"
        );
        reached
    }
}
