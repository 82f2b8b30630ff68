//! Server state shared by every handler.

use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use axum::http::StatusCode;
use tokio::sync::watch;

use crate::{
    domain::{EmployeeId, MessageRepository, RosterRepository},
    infrastructure::registry::{ConnectionRegistry, EvictionReceiver, RoomMembershipIndex},
    usecase::{DeliverMessageUseCase, RecipientResolver},
};

/// Query parameters of every transport handshake
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "employeeId", alias = "employee_id")]
    pub employee_id: Option<i64>,
}

impl ConnectQuery {
    /// The authenticated employee, or `400 Bad Request`.
    pub fn employee_id(&self) -> Result<EmployeeId, StatusCode> {
        let Some(raw) = self.employee_id else {
            tracing::warn!("handshake without employeeId");
            return Err(StatusCode::BAD_REQUEST);
        };
        EmployeeId::try_from(raw).map_err(|e| {
            tracing::warn!(employee_id = raw, error = %e, "handshake with invalid employeeId");
            StatusCode::BAD_REQUEST
        })
    }
}

/// Shared application state
pub struct AppState {
    /// Message persistence collaborator
    pub messages: Arc<dyn MessageRepository>,
    /// Roster collaborator
    pub roster: Arc<dyn RosterRepository>,
    pub registry: Arc<ConnectionRegistry>,
    pub rooms: Arc<RoomMembershipIndex>,
    /// Long-lived: owns the per-room ordering locks
    pub delivery: Arc<DeliverMessageUseCase>,
    /// Upper bound for one socket write
    pub write_timeout: Duration,
    /// Flipped to true once graceful shutdown begins
    pub shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Build the state and hand back the eviction queue for the eviction loop.
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        roster: Arc<dyn RosterRepository>,
        write_timeout: Duration,
    ) -> (Arc<Self>, EvictionReceiver) {
        let (registry, evictions) = ConnectionRegistry::new();
        let registry = Arc::new(registry);
        let rooms = Arc::new(RoomMembershipIndex::new());
        let delivery = Arc::new(DeliverMessageUseCase::new(
            messages.clone(),
            RecipientResolver::new(roster.clone()),
            registry.clone(),
            rooms.clone(),
        ));

        let state = Arc::new(Self {
            messages,
            roster,
            registry,
            rooms,
            delivery,
            write_timeout,
            shutdown: watch::Sender::new(false),
        });
        (state, evictions)
    }

    /// Resolves once shutdown has begun. Long-lived responses end on it.
    pub fn shutdown_started(&self) -> impl Future<Output = ()> + Send + 'static + use<> {
        let mut shutdown = self.shutdown.subscribe();
        async move {
            // the sender lives in the state, so an error means it is already gone
            let _ = shutdown.wait_for(|started| *started).await;
        }
    }
}
