//! Collaborator traits implemented by the data store.
//!
//! The CRUD application owns the schema. This server only needs to create
//! messages, find or create private rooms, and read rooms and the roster.
//! Implementations live in the infrastructure layer (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{ChatRoom, Message},
    error::RepositoryError,
    value_object::{EmployeeId, MessageContent, RoomId},
};

/// Message persistence collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message and return the stored copy.
    async fn create_message(
        &self,
        room_id: RoomId,
        sender_id: EmployeeId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError>;

    /// Find the private 1:1 room between two employees, creating it if needed.
    async fn ensure_private_room(
        &self,
        employee_a: EmployeeId,
        employee_b: EmployeeId,
    ) -> Result<RoomId, RepositoryError>;

    /// Messages of a room in persisted order (used for fetch-on-reconnect).
    async fn messages_in(&self, room_id: RoomId) -> Result<Vec<Message>, RepositoryError>;
}

/// Roster and participant lookup collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Explicit participants of a room. Empty for participant-less rooms.
    async fn participants_of(&self, room_id: RoomId) -> Result<Vec<EmployeeId>, RepositoryError>;

    /// Every employee on the staff roster.
    async fn all_employee_ids(&self) -> Result<Vec<EmployeeId>, RepositoryError>;

    async fn list_rooms(&self) -> Result<Vec<ChatRoom>, RepositoryError>;
}
