//! Duplex socket handler: named events with optional acknowledgements.

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
    domain::{Connection, EmployeeId},
    infrastructure::{
        dto::websocket::{ClientEvent, ClientEventError, DuplexFrame},
        transport::DuplexAdapter,
    },
    ui::{
        eviction::disconnect_connection,
        state::{AppState, ConnectQuery},
    },
    usecase::ConnectEmployeeUseCase,
};

use super::socket::{dispatch_client_event, rejected_frame_ack, write_pump};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let employee_id = query.employee_id()?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, employee_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, employee_id: EmployeeId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive frames
    let (tx, rx) = mpsc::unbounded_channel();
    let adapter = Arc::new(DuplexAdapter::new(tx));

    let connect_usecase = ConnectEmployeeUseCase::new(state.registry.clone());
    let connection = connect_usecase.execute(employee_id, adapter.clone()).await;

    // Spawn a task to write queued frames to this connection
    let mut send_task = tokio::spawn(write_pump(sender, rx, state.write_timeout, connection.id));

    // Spawn a task to receive events from this connection
    let recv_state = state.clone();
    let recv_connection = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %recv_connection.id,
                        error = %e,
                        "socket read failed"
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_frame(&recv_state, &recv_connection, &adapter, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!(
                        connection_id = %recv_connection.id,
                        "client requested close"
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    disconnect_connection(&state, connection.id).await;
}

async fn handle_frame(
    state: &AppState,
    connection: &Connection,
    adapter: &DuplexAdapter,
    text: &str,
) {
    let frame = match serde_json::from_str::<DuplexFrame>(text) {
        Ok(frame) => frame,
        Err(_) => {
            // no ack id to answer to
            rejected_frame_ack(connection.id, &ClientEventError::NotJson);
            return;
        }
    };

    let DuplexFrame { event, data, ack } = frame;
    let reply = match ClientEvent::parse(&event, data) {
        Ok(client_event) => dispatch_client_event(state, connection, client_event).await,
        Err(e) => rejected_frame_ack(connection.id, &e),
    };

    if let Some(ack) = ack
        && adapter.send_ack(ack, &reply).is_err()
    {
        tracing::debug!(connection_id = %connection.id, "connection closed before ack");
    }
}
