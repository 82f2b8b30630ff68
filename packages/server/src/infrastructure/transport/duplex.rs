//! Duplex socket adapter: named events plus acknowledgements.

use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{TransportAdapter, TransportError, TransportKind},
    infrastructure::dto::websocket::event,
};

/// Encode an event frame: `{"event": <name>, "data": <payload>}`
pub fn encode_event(name: &str, payload: &Value) -> String {
    json!({ "event": name, "data": payload }).to_string()
}

/// Encode an acknowledgement frame for the client's `ack` id
pub fn encode_ack(ack: u64, payload: &Value) -> String {
    json!({ "event": event::ACK, "ack": ack, "data": payload }).to_string()
}

pub struct DuplexAdapter {
    outbound: UnboundedSender<String>,
}

impl DuplexAdapter {
    pub fn new(outbound: UnboundedSender<String>) -> Self {
        Self { outbound }
    }

    /// Queue an acknowledgement on the same ordered queue as events.
    pub fn send_ack(&self, ack: u64, payload: &Value) -> Result<(), TransportError> {
        self.outbound
            .send(encode_ack(ack, payload))
            .map_err(|_| TransportError::Closed(TransportKind::Duplex))
    }
}

impl TransportAdapter for DuplexAdapter {
    fn kind(&self) -> TransportKind {
        TransportKind::Duplex
    }

    fn send(&self, event: &str, payload: &Value) -> Result<(), TransportError> {
        self.outbound
            .send(encode_event(event, payload))
            .map_err(|_| TransportError::Closed(TransportKind::Duplex))
    }
}
