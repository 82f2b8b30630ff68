//! Server-sent event stream adapter.

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{TransportAdapter, TransportError, TransportKind};

/// One SSE event, before HTTP framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub event: String,
    pub data: String,
}

impl StreamFrame {
    pub fn new(event: &str, payload: &Value) -> Self {
        Self {
            event: event.to_string(),
            data: payload.to_string(),
        }
    }

    /// Wire form: `event: <name>\ndata: <json>\n\n`
    pub fn to_wire(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.data)
    }
}

pub struct StreamAdapter {
    outbound: UnboundedSender<StreamFrame>,
}

impl StreamAdapter {
    pub fn new(outbound: UnboundedSender<StreamFrame>) -> Self {
        Self { outbound }
    }
}

impl TransportAdapter for StreamAdapter {
    fn kind(&self) -> TransportKind {
        TransportKind::Stream
    }

    fn send(&self, event: &str, payload: &Value) -> Result<(), TransportError> {
        self.outbound
            .send(StreamFrame::new(event, payload))
            .map_err(|_| TransportError::Closed(TransportKind::Stream))
    }
}
