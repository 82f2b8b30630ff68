//! Raw fallback socket adapter.
//!
//! Frames are flat JSON objects tagged with `"type"`, e.g.
//! `{"type": "message:new", "message": {...}}`.

use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{TransportAdapter, TransportError, TransportKind},
    infrastructure::dto::websocket::ClientEventError,
};

const TYPE_FIELD: &str = "type";

/// Merge `"type": <name>` into an object payload; wrap anything else as `data`.
pub fn encode_raw(name: &str, payload: &Value) -> String {
    match payload {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            fields.insert(TYPE_FIELD.to_string(), Value::String(name.to_string()));
            Value::Object(fields).to_string()
        }
        other => json!({ "type": name, "data": other }).to_string(),
    }
}

/// Split an inbound raw frame into its event name and the remaining fields.
pub fn decode_raw(text: &str) -> Result<(String, Value), ClientEventError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ClientEventError::NotJson)?;
    let Value::Object(mut fields) = value else {
        return Err(ClientEventError::MissingEventName);
    };
    let name = match fields.remove(TYPE_FIELD) {
        Some(Value::String(name)) => name,
        _ => return Err(ClientEventError::MissingEventName),
    };
    Ok((name, Value::Object(fields)))
}

pub struct RawAdapter {
    outbound: UnboundedSender<String>,
}

impl RawAdapter {
    pub fn new(outbound: UnboundedSender<String>) -> Self {
        Self { outbound }
    }
}

impl TransportAdapter for RawAdapter {
    fn kind(&self) -> TransportKind {
        TransportKind::Raw
    }

    fn send(&self, event: &str, payload: &Value) -> Result<(), TransportError> {
        self.outbound
            .send(encode_raw(event, payload))
            .map_err(|_| TransportError::Closed(TransportKind::Raw))
    }
}
