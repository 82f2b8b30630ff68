//! InMemory chat store
//!
//! ドメイン層が定義する MessageRepository / RosterRepository trait のインメモリ実装。
//! 本番では CRUD アプリケーション側のデータストアが同じ trait を実装します。
//! サーバー単体で動かすため、およびテストのために使用します。

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRoom, EmployeeId, Message, MessageContent, MessageId, MessageRepository, RepositoryError,
    RoomId, RosterRepository, Timestamp,
};

/// Private rooms created on demand get ids from this value upwards
const FIRST_PRIVATE_ROOM_ID: i64 = 10_000;

struct StoreState {
    employees: BTreeMap<EmployeeId, String>,
    rooms: BTreeMap<RoomId, ChatRoom>,
    participants: BTreeMap<RoomId, BTreeSet<EmployeeId>>,
    messages: Vec<Message>,
    next_message_id: i64,
    next_room_id: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            employees: BTreeMap::new(),
            rooms: BTreeMap::new(),
            participants: BTreeMap::new(),
            messages: Vec::new(),
            next_message_id: 1,
            next_room_id: FIRST_PRIVATE_ROOM_ID,
        }
    }
}

/// インメモリ chat store 実装
#[derive(Default)]
pub struct InMemoryChatStore {
    state: Mutex<StoreState>,
}

impl InMemoryChatStore {
    /// 空の store を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// デモ用の従業員とルームを持つ store を作成
    ///
    /// - employees 1..=3
    /// - room 1 "All Staff": 参加者なし（全従業員へのブロードキャスト）
    /// - room 2001 "Front Desk": 参加者 1, 2
    pub fn demo() -> Result<Self, RepositoryError> {
        let id = |value: i64| {
            EmployeeId::new(value).map_err(|e| RepositoryError::Unavailable(e.to_string()))
        };
        let room = |value: i64| {
            RoomId::new(value).map_err(|e| RepositoryError::Unavailable(e.to_string()))
        };

        Ok(Self::new()
            .with_employee(id(1)?, "Aiko Tanaka")
            .with_employee(id(2)?, "Ben Carter")
            .with_employee(id(3)?, "Chika Ito")
            .with_room(
                ChatRoom::new(room(1)?, Some("All Staff".to_string()), true),
                std::iter::empty::<EmployeeId>(),
            )
            .with_room(
                ChatRoom::new(room(2001)?, Some("Front Desk".to_string()), true),
                [id(1)?, id(2)?],
            ))
    }

    /// 従業員を追加（builder）
    pub fn with_employee(mut self, id: EmployeeId, name: &str) -> Self {
        self.state.get_mut().employees.insert(id, name.to_string());
        self
    }

    /// ルームと参加者を追加（builder）
    pub fn with_room(
        mut self,
        room: ChatRoom,
        participants: impl IntoIterator<Item = EmployeeId>,
    ) -> Self {
        let state = self.state.get_mut();
        state
            .participants
            .insert(room.id, participants.into_iter().collect());
        state.rooms.insert(room.id, room);
        self
    }

    /// 保存済みメッセージ数
    pub async fn count_messages(&self) -> usize {
        self.state.lock().await.messages.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryChatStore {
    async fn create_message(
        &self,
        room_id: RoomId,
        sender_id: EmployeeId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.rooms.contains_key(&room_id) {
            return Err(RepositoryError::RoomNotFound(room_id));
        }

        let id = MessageId::new(state.next_message_id)
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        state.next_message_id += 1;

        let message = Message {
            id,
            room_id,
            sender_id,
            sender_name: state.employees.get(&sender_id).cloned(),
            content,
            sent_at: Timestamp::now(),
            correlation_id: None,
        };
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn ensure_private_room(
        &self,
        employee_a: EmployeeId,
        employee_b: EmployeeId,
    ) -> Result<RoomId, RepositoryError> {
        let mut state = self.state.lock().await;
        for employee in [employee_a, employee_b] {
            if !state.employees.contains_key(&employee) {
                return Err(RepositoryError::EmployeeNotFound(employee));
            }
        }

        let pair = BTreeSet::from([employee_a, employee_b]);
        let existing = state
            .rooms
            .values()
            .filter(|room| !room.is_group)
            .find(|room| state.participants.get(&room.id) == Some(&pair))
            .map(|room| room.id);
        if let Some(room_id) = existing {
            return Ok(room_id);
        }

        let room_id = RoomId::new(state.next_room_id)
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        state.next_room_id += 1;
        state.rooms.insert(room_id, ChatRoom::new(room_id, None, false));
        state.participants.insert(room_id, pair);
        tracing::info!(
            room_id = %room_id,
            employee_a = %employee_a,
            employee_b = %employee_b,
            "created private room"
        );
        Ok(room_id)
    }

    async fn messages_in(&self, room_id: RoomId) -> Result<Vec<Message>, RepositoryError> {
        let state = self.state.lock().await;
        if !state.rooms.contains_key(&room_id) {
            return Err(RepositoryError::RoomNotFound(room_id));
        }
        Ok(state
            .messages
            .iter()
            .filter(|message| message.room_id == room_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RosterRepository for InMemoryChatStore {
    async fn participants_of(&self, room_id: RoomId) -> Result<Vec<EmployeeId>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .participants
            .get(&room_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn all_employee_ids(&self) -> Result<Vec<EmployeeId>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.employees.keys().copied().collect())
    }

    async fn list_rooms(&self) -> Result<Vec<ChatRoom>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.rooms.values().cloned().collect())
    }
}
