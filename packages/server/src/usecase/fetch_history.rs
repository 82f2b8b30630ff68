//! UseCase: ルーム一覧と履歴の取得
//!
//! 再接続したクライアントは配信を取りこぼしている可能性があるため、
//! 履歴はこの経路で取り直す（配信の再送は行わない）。

use std::sync::Arc;

use crate::domain::{
    ChatRoom, Message, MessageRepository, RepositoryError, RoomId, RosterRepository,
};

pub struct FetchHistoryUseCase {
    messages: Arc<dyn MessageRepository>,
    roster: Arc<dyn RosterRepository>,
}

impl FetchHistoryUseCase {
    pub fn new(messages: Arc<dyn MessageRepository>, roster: Arc<dyn RosterRepository>) -> Self {
        Self { messages, roster }
    }

    pub async fn rooms(&self) -> Result<Vec<ChatRoom>, RepositoryError> {
        self.roster.list_rooms().await
    }

    /// 永続化順のメッセージ履歴
    pub async fn messages_in(&self, room_id: RoomId) -> Result<Vec<Message>, RepositoryError> {
        self.messages.messages_in(room_id).await
    }
}
