//! Plumbing shared by the duplex and raw socket handlers.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{sink::SinkExt, stream::SplitSink};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    domain::{Connection, ConnectionId, RoomId},
    infrastructure::dto::websocket::{ClientEvent, ClientEventError, MembershipAck, MessageAck},
    ui::state::AppState,
    usecase::{JoinRoomUseCase, LeaveRoomUseCase},
};

use super::submission::build_submission;

/// Drain the connection's outbound queue into the socket.
///
/// Returns when the queue closes, a write fails, or a write takes longer
/// than `write_timeout`. The caller then tears the connection down.
pub async fn write_pump(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: UnboundedReceiver<String>,
    write_timeout: Duration,
    connection_id: ConnectionId,
) {
    while let Some(frame) = outbound.recv().await {
        match tokio::time::timeout(write_timeout, sink.send(Message::Text(frame.into()))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "socket write failed");
                return;
            }
            Err(_) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    timeout_ms = write_timeout.as_millis() as u64,
                    "socket write timed out, dropping connection"
                );
                return;
            }
        }
    }
}

/// Run one client event and build its acknowledgement payload.
pub async fn dispatch_client_event(
    state: &AppState,
    connection: &Connection,
    event: ClientEvent,
) -> Value {
    match event {
        ClientEvent::MessageNew(draft) => {
            let correlation_id = draft.correlation_id.clone();
            let result = match build_submission(draft, Some(connection.employee_id)) {
                Ok(submission) => state.delivery.execute(submission).await,
                Err(e) => Err(e),
            };
            let ack = match result {
                Ok(report) => MessageAck::delivered(&report.message),
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection.id,
                        employee_id = %connection.employee_id,
                        error = %e,
                        "message rejected"
                    );
                    MessageAck::failed(e, correlation_id)
                }
            };
            json!(ack)
        }
        ClientEvent::JoinChat { chat_id } => {
            let ack = match RoomId::try_from(chat_id) {
                Ok(room_id) => {
                    let join_usecase =
                        JoinRoomUseCase::new(state.registry.clone(), state.rooms.clone());
                    match join_usecase.execute(connection.id, room_id).await {
                        Ok(()) => MembershipAck::ok(),
                        Err(e) => MembershipAck::failed(e),
                    }
                }
                Err(e) => MembershipAck::failed(e),
            };
            json!(ack)
        }
        ClientEvent::LeaveChat { chat_id } => {
            let ack = match RoomId::try_from(chat_id) {
                Ok(room_id) => {
                    LeaveRoomUseCase::new(state.rooms.clone())
                        .execute(connection.id, room_id)
                        .await;
                    MembershipAck::ok()
                }
                Err(e) => MembershipAck::failed(e),
            };
            json!(ack)
        }
    }
}

/// Acknowledgement for a frame that never reached a use case.
pub fn rejected_frame_ack(connection_id: ConnectionId, error: &ClientEventError) -> Value {
    tracing::warn!(connection_id = %connection_id, error = %error, "invalid client frame");
    json!({ "ok": false, "error": error.to_string() })
}
