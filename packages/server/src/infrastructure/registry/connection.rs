//! Connection Registry
//!
//! Tracks every live connection, indexed by connection id and by employee id
//! (the always-on per-employee fallback group). Only bookkeeping lives here:
//! writes go through the `TransportAdapter` stored with each entry.
//!
//! Dead connections are reported into a single eviction queue. One consumer
//! (see `ui::eviction`) drains it and runs the disconnect use case, so
//! removal and offline presence happen in one place.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tokio::sync::{
    Mutex, MutexGuard,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use crate::domain::{
    Connection, ConnectionId, ConnectionIdFactory, EmployeeId, Timestamp, TransportAdapter,
    TransportKind,
};

/// Receiving end of the eviction queue
pub type EvictionReceiver = UnboundedReceiver<ConnectionId>;

/// A live connection together with its write side
#[derive(Clone)]
pub struct ConnectionHandle {
    pub connection: Connection,
    pub adapter: Arc<dyn TransportAdapter>,
}

/// Result of removing a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unregistered {
    pub connection: Connection,
    /// True when the employee has no live connection left
    pub was_last: bool,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, ConnectionHandle>,
    by_employee: HashMap<EmployeeId, HashSet<ConnectionId>>,
}

pub struct ConnectionRegistry {
    state: Mutex<RegistryState>,
    evictions: UnboundedSender<ConnectionId>,
    presence: Mutex<()>,
}

impl ConnectionRegistry {
    /// Create a registry and the receiving end of its eviction queue.
    pub fn new() -> (Self, EvictionReceiver) {
        let (evictions, receiver) = mpsc::unbounded_channel();
        let registry = Self {
            state: Mutex::new(RegistryState::default()),
            evictions,
            presence: Mutex::new(()),
        };
        (registry, receiver)
    }

    /// Add a connection to the employee's fallback group.
    pub async fn register(
        &self,
        employee_id: EmployeeId,
        adapter: Arc<dyn TransportAdapter>,
    ) -> Connection {
        let connection = Connection::new(
            ConnectionIdFactory::generate(),
            employee_id,
            adapter.kind(),
            Timestamp::now(),
        );

        let mut state = self.state.lock().await;
        state
            .by_employee
            .entry(employee_id)
            .or_default()
            .insert(connection.id);
        state.connections.insert(
            connection.id,
            ConnectionHandle {
                connection: connection.clone(),
                adapter,
            },
        );
        tracing::debug!(
            connection_id = %connection.id,
            employee_id = %employee_id,
            transport = %connection.transport_kind,
            total = state.connections.len(),
            "connection registered"
        );

        connection
    }

    /// Remove a connection. Returns `None` if it was already gone.
    pub async fn unregister(&self, connection_id: ConnectionId) -> Option<Unregistered> {
        let mut state = self.state.lock().await;
        let handle = state.connections.remove(&connection_id)?;
        let employee_id = handle.connection.employee_id;

        let was_last = match state.by_employee.get_mut(&employee_id) {
            Some(group) => {
                group.remove(&connection_id);
                group.is_empty()
            }
            None => true,
        };
        if was_last {
            state.by_employee.remove(&employee_id);
        }

        tracing::debug!(
            connection_id = %connection_id,
            employee_id = %employee_id,
            was_last,
            "connection unregistered"
        );

        Some(Unregistered {
            connection: handle.connection,
            was_last,
        })
    }

    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionHandle> {
        let state = self.state.lock().await;
        state.connections.get(&connection_id).cloned()
    }

    pub async fn contains(&self, connection_id: ConnectionId) -> bool {
        let state = self.state.lock().await;
        state.connections.contains_key(&connection_id)
    }

    /// Every live connection of one employee, across transport kinds.
    pub async fn connections_for(&self, employee_id: EmployeeId) -> Vec<ConnectionHandle> {
        let state = self.state.lock().await;
        state
            .by_employee
            .get(&employee_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.connections.get(id).cloned())
            .collect()
    }

    /// Every live connection.
    pub async fn all(&self) -> Vec<ConnectionHandle> {
        let state = self.state.lock().await;
        state.connections.values().cloned().collect()
    }

    /// Live connection count per employee, ordered by employee id.
    pub async fn snapshot(&self) -> Vec<(EmployeeId, usize)> {
        let state = self.state.lock().await;
        let mut snapshot: Vec<(EmployeeId, usize)> = state
            .by_employee
            .iter()
            .map(|(employee_id, group)| (*employee_id, group.len()))
            .collect();
        snapshot.sort_by_key(|(employee_id, _)| *employee_id);
        snapshot
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    /// Serialize presence transitions.
    ///
    /// Hold the guard from `register`/`unregister` until the matching
    /// presence broadcast has been queued, so online and offline go out
    /// in the same order as the registry changed.
    pub async fn presence_transition(&self) -> MutexGuard<'_, ()> {
        self.presence.lock().await
    }

    /// Report a connection whose transport failed. Removal happens
    /// asynchronously through the eviction queue.
    pub fn report_failure(&self, connection_id: ConnectionId, kind: TransportKind) {
        tracing::warn!(
            connection_id = %connection_id,
            transport = %kind,
            "write to dead connection, scheduling eviction"
        );
        if self.evictions.send(connection_id).is_err() {
            tracing::error!("eviction queue is closed");
        }
    }

    /// A guard that reports `connection_id` for eviction when dropped.
    ///
    /// Used by transports that only learn about a close by having their
    /// response body dropped (event streams).
    pub fn eviction_guard(&self, connection_id: ConnectionId) -> EvictionGuard {
        EvictionGuard {
            connection_id,
            evictions: self.evictions.clone(),
        }
    }
}

pub struct EvictionGuard {
    connection_id: ConnectionId,
    evictions: UnboundedSender<ConnectionId>,
}

impl Drop for EvictionGuard {
    fn drop(&mut self) {
        // the receiver is gone only during shutdown
        let _ = self.evictions.send(self.connection_id);
    }
}
