//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::ChatRoom;

/// Body of `POST /api/chats/{chat_id}/messages` and the direct variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub content: String,
    pub sender_id: i64,
    #[serde(
        rename = "correlationId",
        alias = "tempId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correlation_id: Option<String>,
}

/// Room entry for the chat list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummaryDto {
    pub chat_id: i64,
    pub name: Option<String>,
    pub is_group: bool,
}

impl From<&ChatRoom> for ChatSummaryDto {
    fn from(room: &ChatRoom) -> Self {
        Self {
            chat_id: room.id.value(),
            name: room.name.clone(),
            is_group: room.is_group,
        }
    }
}

/// Live connection count per employee (diagnostics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSnapshotDto {
    #[serde(rename = "employeeId")]
    pub employee_id: i64,
    pub connections: usize,
}
