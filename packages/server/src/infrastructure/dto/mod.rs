//! Data transfer objects for the wire protocols.

pub mod http;
pub mod websocket;
