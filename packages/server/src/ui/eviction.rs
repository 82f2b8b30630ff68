//! Eviction loop.
//!
//! Every dead connection, whether reported by a failed write or by a
//! dropped event stream, ends up here and is disconnected exactly once.

use std::sync::Arc;

use crate::{
    domain::ConnectionId,
    infrastructure::registry::EvictionReceiver,
    ui::state::AppState,
    usecase::{DisconnectEmployeeUseCase, DisconnectError},
};

/// Run the disconnect use case, tolerating connections that are already gone.
pub async fn disconnect_connection(state: &AppState, connection_id: ConnectionId) {
    let disconnect_usecase =
        DisconnectEmployeeUseCase::new(state.registry.clone(), state.rooms.clone());

    match disconnect_usecase.execute(connection_id).await {
        Ok(_) => {}
        Err(DisconnectError::UnknownConnection(_)) => {
            tracing::debug!(connection_id = %connection_id, "connection already removed");
        }
    }
}

/// Drain the eviction queue until the server shuts down.
pub async fn run_eviction_loop(state: Arc<AppState>, mut evictions: EvictionReceiver) {
    while let Some(connection_id) = evictions.recv().await {
        disconnect_connection(&state, connection_id).await;
    }
    tracing::debug!("eviction queue closed");
}
