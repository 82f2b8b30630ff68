//! Raw fallback socket handler.
//!
//! Same events as the duplex socket, framed as flat `"type"`-tagged JSON.
//! Every inbound frame is answered with a `{"type": "ack", ...}` frame.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::stream::StreamExt;
use tokio::sync::mpsc;

use crate::{
    domain::{Connection, EmployeeId, TransportAdapter},
    infrastructure::{
        dto::websocket::{ClientEvent, event},
        transport::{RawAdapter, raw::decode_raw},
    },
    ui::{
        eviction::disconnect_connection,
        state::{AppState, ConnectQuery},
    },
    usecase::ConnectEmployeeUseCase,
};

use super::socket::{dispatch_client_event, rejected_frame_ack, write_pump};

pub async fn raw_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let employee_id = query.employee_id()?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, employee_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, employee_id: EmployeeId) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let adapter = Arc::new(RawAdapter::new(tx));

    let connect_usecase = ConnectEmployeeUseCase::new(state.registry.clone());
    let connection = connect_usecase.execute(employee_id, adapter.clone()).await;

    let mut send_task = tokio::spawn(write_pump(sender, rx, state.write_timeout, connection.id));

    let recv_state = state.clone();
    let recv_connection = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_frame(&recv_state, &recv_connection, &adapter, text.as_str()).await;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    disconnect_connection(&state, connection.id).await;
}

async fn handle_frame(state: &AppState, connection: &Connection, adapter: &RawAdapter, text: &str) {
    let reply = match decode_raw(text).and_then(|(name, data)| ClientEvent::parse(&name, data)) {
        Ok(client_event) => dispatch_client_event(state, connection, client_event).await,
        Err(e) => rejected_frame_ack(connection.id, &e),
    };

    if adapter.send(event::ACK, &reply).is_err() {
        tracing::debug!(connection_id = %connection.id, "connection closed before ack");
    }
}
