//! Handler modules for HTTP, WebSocket and SSE endpoints.

pub mod http;
pub mod raw;
pub mod socket;
pub mod sse;
pub mod submission;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    chat_messages, connection_snapshot, health_check, list_chats, post_direct_message,
    post_room_message,
};

// Re-export realtime handlers
pub use raw::raw_websocket_handler;
pub use sse::stream_handler;
pub use websocket::websocket_handler;
