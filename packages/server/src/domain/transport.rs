//! Transport adapter seam.

use serde_json::Value;

use super::{entity::TransportKind, error::TransportError};

/// Write side of one live connection.
///
/// Every transport kind (duplex socket, event stream, raw socket) implements
/// this, so the registry and the use cases never see a concrete transport.
/// `send` must not block: implementations hand the frame to the connection's
/// own writer and return immediately.
pub trait TransportAdapter: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Queue `event` with `payload` for this connection.
    ///
    /// Returns `TransportError::Closed` once the connection's writer is gone.
    fn send(&self, event: &str, payload: &Value) -> Result<(), TransportError>;
}
