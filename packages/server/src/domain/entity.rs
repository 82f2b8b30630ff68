//! Core domain models for staff messaging.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_object::{
    ConnectionId, CorrelationId, EmployeeId, MessageContent, MessageId, RoomId, Timestamp,
};

/// The kind of transport a live connection uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Bidirectional socket session with named events and acks
    Duplex,
    /// One-way server-sent event stream
    Stream,
    /// Plain WebSocket fallback channel
    Raw,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Duplex => "duplex",
            Self::Stream => "stream",
            Self::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// A live client connection, as tracked by the connection registry.
///
/// Rooms joined through this connection are owned by the room membership
/// index, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub employee_id: EmployeeId,
    pub transport_kind: TransportKind,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        employee_id: EmployeeId,
        transport_kind: TransportKind,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            id,
            employee_id,
            transport_kind,
            connected_at,
        }
    }
}

/// A chat room as stored by the external data store (read-only here)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: RoomId,
    pub name: Option<String>,
    pub is_group: bool,
}

impl ChatRoom {
    pub fn new(id: RoomId, name: Option<String>, is_group: bool) -> Self {
        Self { id, name, is_group }
    }
}

/// A persisted chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: EmployeeId,
    pub sender_name: Option<String>,
    pub content: MessageContent,
    pub sent_at: Timestamp,
    /// Echo of the submitter's token; never persisted
    pub correlation_id: Option<CorrelationId>,
}

impl Message {
    /// Attach the submitter's correlation token to a freshly persisted message.
    pub fn with_correlation(mut self, correlation_id: Option<CorrelationId>) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

/// Where a submitted message should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// An existing chat room
    Room(RoomId),
    /// The private 1:1 room between the sender and this employee
    Direct(EmployeeId),
}

/// A validated, not yet persisted, message submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSubmission {
    pub target: MessageTarget,
    pub sender_id: EmployeeId,
    pub content: MessageContent,
    pub correlation_id: Option<CorrelationId>,
}

/// Online/offline transition of an employee, derived from registry changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub employee_id: EmployeeId,
    pub online: bool,
}

impl PresenceEvent {
    pub fn online(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            online: true,
        }
    }

    pub fn offline(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            online: false,
        }
    }
}
