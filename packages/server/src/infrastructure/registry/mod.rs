//! In-process live state: who is connected, and who is viewing which room.
//!
//! These two maps are the only shared mutable state of the server.

pub mod connection;
pub mod room_membership;

pub use connection::{
    ConnectionHandle, ConnectionRegistry, EvictionGuard, EvictionReceiver, Unregistered,
};
pub use room_membership::RoomMembershipIndex;
