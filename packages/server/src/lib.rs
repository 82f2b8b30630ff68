//! Real-time staff messaging and presence fan-out server.
//!
//! Clients connect over a duplex WebSocket, a raw WebSocket, or an SSE
//! stream. Messages are persisted through an external store and then
//! delivered to every live connection of every recipient exactly once.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerArgs, run};
