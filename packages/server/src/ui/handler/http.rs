//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{RepositoryError, RoomId},
    infrastructure::dto::{
        http::{ChatSummaryDto, ConnectionSnapshotDto, PostMessageRequest},
        websocket::{MessageAck, MessageDraft, ServerMessage},
    },
    ui::state::AppState,
    usecase::{DeliveryError, FetchHistoryUseCase},
};

use super::submission::build_submission;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of chat rooms
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChatSummaryDto>>, StatusCode> {
    let fetch_usecase = FetchHistoryUseCase::new(state.messages.clone(), state.roster.clone());
    let rooms = fetch_usecase.rooms().await.map_err(repository_status)?;
    Ok(Json(rooms.iter().map(ChatSummaryDto::from).collect()))
}

/// Message history of one room, for clients catching up after a reconnect
pub async fn chat_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<ServerMessage>>, StatusCode> {
    let room_id = RoomId::try_from(chat_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let fetch_usecase = FetchHistoryUseCase::new(state.messages.clone(), state.roster.clone());
    let messages = fetch_usecase
        .messages_in(room_id)
        .await
        .map_err(repository_status)?;
    Ok(Json(messages.iter().map(ServerMessage::from).collect()))
}

/// Submit a message to a room
pub async fn post_room_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Json(body): Json<PostMessageRequest>,
) -> (StatusCode, Json<MessageAck>) {
    let draft = MessageDraft {
        chat_id: Some(chat_id),
        employee_id: None,
        content: body.content,
        correlation_id: body.correlation_id,
        sender_id: Some(body.sender_id),
    };
    submit(&state, draft).await
}

/// Submit a message to the private room shared with `employee_id`
pub async fn post_direct_message(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i64>,
    Json(body): Json<PostMessageRequest>,
) -> (StatusCode, Json<MessageAck>) {
    let draft = MessageDraft {
        chat_id: None,
        employee_id: Some(employee_id),
        content: body.content,
        correlation_id: body.correlation_id,
        sender_id: Some(body.sender_id),
    };
    submit(&state, draft).await
}

/// Live connection count per employee
pub async fn connection_snapshot(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ConnectionSnapshotDto>> {
    let snapshot = state
        .registry
        .snapshot()
        .await
        .into_iter()
        .map(|(employee_id, connections)| ConnectionSnapshotDto {
            employee_id: employee_id.value(),
            connections,
        })
        .collect();
    Json(snapshot)
}

async fn submit(state: &AppState, draft: MessageDraft) -> (StatusCode, Json<MessageAck>) {
    let correlation_id = draft.correlation_id.clone();
    let result = match build_submission(draft, None) {
        Ok(submission) => state.delivery.execute(submission).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => (
            StatusCode::CREATED,
            Json(MessageAck::delivered(&report.message)),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "message rejected");
            let status = match e {
                DeliveryError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
                DeliveryError::PersistenceFailure(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(MessageAck::failed(e, correlation_id)))
        }
    }
}

fn repository_status(error: RepositoryError) -> StatusCode {
    tracing::warn!(error = %error, "chat store lookup failed");
    match error {
        RepositoryError::RoomNotFound(_) | RepositoryError::EmployeeNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        RepositoryError::Unavailable(_) => StatusCode::BAD_GATEWAY,
    }
}
