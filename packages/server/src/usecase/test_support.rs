//! UseCase テスト用の補助関数

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    domain::{Connection, EmployeeId, RoomId, TransportAdapter},
    infrastructure::{
        registry::ConnectionRegistry,
        transport::{DuplexAdapter, RawAdapter, StreamAdapter, StreamFrame},
    },
};

pub fn employee(id: i64) -> EmployeeId {
    EmployeeId::new(id).unwrap()
}

pub fn room(id: i64) -> RoomId {
    RoomId::new(id).unwrap()
}

/// duplex 接続を presence なしで登録する
pub async fn connect_duplex(
    registry: &ConnectionRegistry,
    employee_id: i64,
) -> (Connection, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let adapter: Arc<dyn TransportAdapter> = Arc::new(DuplexAdapter::new(tx));
    (registry.register(employee(employee_id), adapter).await, rx)
}

pub async fn connect_raw(
    registry: &ConnectionRegistry,
    employee_id: i64,
) -> (Connection, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let adapter: Arc<dyn TransportAdapter> = Arc::new(RawAdapter::new(tx));
    (registry.register(employee(employee_id), adapter).await, rx)
}

pub async fn connect_stream(
    registry: &ConnectionRegistry,
    employee_id: i64,
) -> (Connection, UnboundedReceiver<StreamFrame>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let adapter: Arc<dyn TransportAdapter> = Arc::new(StreamAdapter::new(tx));
    (registry.register(employee(employee_id), adapter).await, rx)
}

/// キューに溜まった duplex フレームから、指定イベントの data を取り出す
pub fn drain_events(rx: &mut UnboundedReceiver<String>, name: &str) -> Vec<Value> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        let frame: Value = serde_json::from_str(&frame).unwrap();
        if frame["event"] == name {
            events.push(frame["data"].clone());
        }
    }
    events
}
