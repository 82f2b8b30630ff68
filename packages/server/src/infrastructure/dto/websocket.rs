//! Event payload DTOs shared by every transport.
//!
//! Event names are identical on duplex sockets, raw sockets, and SSE.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::{EmployeeId, Message, PresenceEvent};

/// Event names
pub mod event {
    pub const MESSAGE_NEW: &str = "message:new";
    pub const JOIN_CHAT: &str = "join:chat";
    pub const LEAVE_CHAT: &str = "leave:chat";
    pub const PRESENCE_UPDATE: &str = "presence:update";
    pub const STAFF_ONLINE: &str = "staff:online";
    pub const STAFF_OFFLINE: &str = "staff:offline";
    /// Sent once at the start of every event stream
    pub const CONNECTED: &str = "connected";
    pub const ACK: &str = "ack";
}

/// Inbound frame on the duplex socket: `{"event", "data", "ack"?}`
#[derive(Debug, Clone, Deserialize)]
pub struct DuplexFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    /// Present when the client expects an acknowledgement
    #[serde(default)]
    pub ack: Option<u64>,
}

/// Body of a `message:new` submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDraft {
    pub chat_id: Option<i64>,
    #[serde(rename = "employeeId", alias = "employee_id")]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "correlationId", alias = "tempId")]
    pub correlation_id: Option<String>,
    pub sender_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct NewMessageRequest {
    message: MessageDraft,
}

/// `join:chat` / `leave:chat` body. A bare chat id is accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ChatRef {
    Object { chat_id: i64 },
    Bare(i64),
}

impl ChatRef {
    fn chat_id(&self) -> i64 {
        match self {
            Self::Object { chat_id } | Self::Bare(chat_id) => *chat_id,
        }
    }
}

/// Client-to-server events, validated at the transport boundary
#[derive(Debug, Clone)]
pub enum ClientEvent {
    MessageNew(MessageDraft),
    JoinChat { chat_id: i64 },
    LeaveChat { chat_id: i64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientEventError {
    #[error("frame is not valid JSON")]
    NotJson,

    #[error("frame has no event name")]
    MissingEventName,

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("invalid payload for '{event}': {reason}")]
    Malformed { event: String, reason: String },
}

impl ClientEvent {
    /// Validate `data` against the schema of `event`.
    pub fn parse(event: &str, data: Value) -> Result<Self, ClientEventError> {
        let malformed = |e: serde_json::Error| ClientEventError::Malformed {
            event: event.to_string(),
            reason: e.to_string(),
        };
        match event {
            event::MESSAGE_NEW => serde_json::from_value::<NewMessageRequest>(data)
                .map(|request| Self::MessageNew(request.message))
                .map_err(malformed),
            event::JOIN_CHAT => serde_json::from_value::<ChatRef>(data)
                .map(|chat| Self::JoinChat {
                    chat_id: chat.chat_id(),
                })
                .map_err(malformed),
            event::LEAVE_CHAT => serde_json::from_value::<ChatRef>(data)
                .map(|chat| Self::LeaveChat {
                    chat_id: chat.chat_id(),
                })
                .map_err(malformed),
            other => Err(ClientEventError::UnknownEvent(other.to_string())),
        }
    }
}

/// Persisted message as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub message_id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: Option<String>,
    pub content: String,
    /// RFC 3339
    pub sent_at: String,
    #[serde(
        rename = "correlationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correlation_id: Option<String>,
}

impl From<&Message> for ServerMessage {
    fn from(message: &Message) -> Self {
        Self {
            message_id: message.id.value(),
            chat_id: message.room_id.value(),
            sender_id: message.sender_id.value(),
            sender_name: message.sender_name.clone(),
            content: message.content.as_str().to_string(),
            sent_at: staffchat_shared::time::timestamp_to_jst_rfc3339(message.sent_at.value()),
            correlation_id: message
                .correlation_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
        }
    }
}

/// `message:new` server-to-client payload
pub fn message_new_payload(message: &Message) -> Value {
    json!({ "message": ServerMessage::from(message) })
}

/// Presence payload shared by `presence:update`, `staff:online`, `staff:offline`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresencePayload {
    pub employee_id: i64,
    pub online: bool,
}

impl From<PresenceEvent> for PresencePayload {
    fn from(event: PresenceEvent) -> Self {
        Self {
            employee_id: event.employee_id.value(),
            online: event.online,
        }
    }
}

pub fn presence_payload(event: PresenceEvent) -> Value {
    json!(PresencePayload::from(event))
}

/// `connected` payload, first event of every stream
pub fn connected_payload(employee_id: EmployeeId) -> Value {
    json!({ "ok": true, "employeeId": employee_id.value() })
}

/// Acknowledgement of a `message:new` submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ServerMessage>,
    #[serde(
        rename = "correlationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageAck {
    pub fn delivered(message: &Message) -> Self {
        Self {
            ok: true,
            message: Some(ServerMessage::from(message)),
            correlation_id: message
                .correlation_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl ToString, correlation_id: Option<String>) -> Self {
        Self {
            ok: false,
            message: None,
            correlation_id,
            error: Some(error.to_string()),
        }
    }
}

/// Acknowledgement of `join:chat` / `leave:chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipAck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MembershipAck {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}
