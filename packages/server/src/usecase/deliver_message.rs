//! UseCase: メッセージ配信（永続化 → 受信者解決 → 2 経路ファンアウト）
//!
//! 1. 1:1 宛ての場合は 2 人のプライベートルームを確保する
//! 2. ルームごとに直列化して永続化する（失敗時は何も配信しない）
//! 3. ルームに参加している全接続へ送る（ルーム経路）
//! 4. 受信者の全接続のうち、3 で届いていない接続へ送る（フォールバック経路）
//!
//! ルームを離れた接続や、まだ参加していない接続にもフォールバック経路で届く。
//! 1 つの接続には 1 回だけ届く。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeliverMessageUseCase::execute() メソッド
//! - 2 経路の重複排除、永続化失敗時の無配信、1:1 ルームの確保、ルームロックの片付け
//!
//! ### なぜこのテストが必要か
//! - ルーム経路とフォールバック経路の両方に該当する接続に二重に届かないことを保証
//! - 永続化できなかったメッセージが誰にも見えないことを保証
//! - 死んだ接続があっても他の受信者への配信が止まらないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者ありのルーム、全体ルーム、1:1 メッセージ
//! - 異常系：永続化失敗、書き込み失敗
//! - エッジケース：ルームを離れた受信者、参加者でない接続のルーム参加

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Arc,
    time::Instant,
};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, CorrelationId, EmployeeId, Message, MessageContent, MessageRepository,
        MessageSubmission, MessageTarget, RoomId,
    },
    infrastructure::{
        dto::websocket::{event, message_new_payload},
        registry::{ConnectionHandle, ConnectionRegistry, RoomMembershipIndex},
    },
};

use super::{error::DeliveryError, resolve_recipients::RecipientResolver};

/// 配信結果
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// 永続化されたメッセージ（correlation id 付き）
    pub message: Message,
    pub recipients: BTreeSet<EmployeeId>,
    /// ルーム経路で送信できた接続数
    pub room_deliveries: usize,
    /// フォールバック経路で送信できた接続数
    pub fallback_deliveries: usize,
    /// 書き込みに失敗し、退去キューに報告した接続
    pub failed_connections: Vec<ConnectionId>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.room_deliveries + self.fallback_deliveries
    }
}

/// メッセージ配信のユースケース
///
/// ルームごとのロックを持つため、他のユースケースと違い
/// サーバー起動時に 1 つだけ作成して共有する。
pub struct DeliverMessageUseCase {
    messages: Arc<dyn MessageRepository>,
    resolver: RecipientResolver,
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomMembershipIndex>,
    room_locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

/// 1 回のファンアウト中の送信状況
#[derive(Default)]
struct Fanout {
    attempted: HashSet<ConnectionId>,
    sent: usize,
    failed: Vec<ConnectionId>,
}

impl Fanout {
    /// まだ試していない接続にだけ送る。送信できたら true。
    fn send_once(
        &mut self,
        registry: &ConnectionRegistry,
        handle: &ConnectionHandle,
        payload: &Value,
    ) -> bool {
        let connection = &handle.connection;
        if !self.attempted.insert(connection.id) {
            return false;
        }
        match handle.adapter.send(event::MESSAGE_NEW, payload) {
            Ok(()) => {
                self.sent += 1;
                true
            }
            Err(_) => {
                registry.report_failure(connection.id, connection.transport_kind);
                self.failed.push(connection.id);
                false
            }
        }
    }
}

impl DeliverMessageUseCase {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        resolver: RecipientResolver,
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<RoomMembershipIndex>,
    ) -> Self {
        Self {
            messages,
            resolver,
            registry,
            rooms,
            room_locks: Mutex::new(HashMap::new()),
        }
    }

    /// メッセージ配信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(DeliveryReport)` - 永続化に成功した（個々の接続への書き込み失敗は含む）
    /// * `Err(DeliveryError)` - 永続化に失敗した。どの接続にも送っていない
    pub async fn execute(
        &self,
        submission: MessageSubmission,
    ) -> Result<DeliveryReport, DeliveryError> {
        let MessageSubmission {
            target,
            sender_id,
            content,
            correlation_id,
        } = submission;

        // 1. 配信先ルームの決定
        let room_id = match target {
            MessageTarget::Room(room_id) => room_id,
            MessageTarget::Direct(peer_id) => self
                .messages
                .ensure_private_room(sender_id, peer_id)
                .await
                .inspect_err(|e| {
                    tracing::warn!(
                        sender_id = %sender_id,
                        peer_id = %peer_id,
                        error = %e,
                        "failed to resolve private room"
                    );
                })?,
        };

        // 2. 同じルームへの配信は永続化順に直列化する
        let lock = self.room_lock(room_id).await;
        let result = {
            let _ordered = lock.lock().await;
            self.deliver_in_room(room_id, sender_id, content, correlation_id)
                .await
        };
        self.release_room_lock(room_id, lock).await;
        result
    }

    async fn deliver_in_room(
        &self,
        room_id: RoomId,
        sender_id: EmployeeId,
        content: MessageContent,
        correlation_id: Option<CorrelationId>,
    ) -> Result<DeliveryReport, DeliveryError> {
        let started = Instant::now();
        let message = self
            .messages
            .create_message(room_id, sender_id, content)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    room_id = %room_id,
                    sender_id = %sender_id,
                    error = %e,
                    "failed to persist message, nothing delivered"
                );
            })?
            .with_correlation(correlation_id);

        // 3. 受信者の解決（失敗してもメッセージは永続化済み）
        let recipients = self.resolver.resolve(room_id).await;

        let payload = message_new_payload(&message);
        let mut fanout = Fanout::default();

        // 4. ルーム経路
        for connection_id in self.rooms.connections_in_room(room_id).await {
            if let Some(handle) = self.registry.get(connection_id).await {
                fanout.send_once(&self.registry, &handle, &payload);
            }
        }
        let room_deliveries = fanout.sent;

        // 5. フォールバック経路（ルーム経路で試した接続は除く）
        for employee_id in &recipients {
            for handle in self.registry.connections_for(*employee_id).await {
                fanout.send_once(&self.registry, &handle, &payload);
            }
        }
        let fallback_deliveries = fanout.sent - room_deliveries;

        tracing::info!(
            message_id = %message.id,
            room_id = %room_id,
            sender_id = %sender_id,
            recipients = recipients.len(),
            room_deliveries,
            fallback_deliveries,
            failed = fanout.failed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "message delivered"
        );

        Ok(DeliveryReport {
            message,
            recipients,
            room_deliveries,
            fallback_deliveries,
            failed_connections: fanout.failed,
        })
    }

    async fn room_lock(&self, room_id: RoomId) -> Arc<Mutex<()>> {
        let mut locks = self.room_locks.lock().await;
        locks.entry(room_id).or_default().clone()
    }

    /// Drop the room's lock entry once no other delivery holds or waits on it.
    async fn release_room_lock(&self, room_id: RoomId, lock: Arc<Mutex<()>>) {
        let mut locks = self.room_locks.lock().await;
        // one reference in the map, one here
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(&room_id);
        }
    }

    #[cfg(test)]
    async fn room_lock_count(&self) -> usize {
        self.room_locks.lock().await.len()
    }
}
