//! Domain layer for the staff messaging server.
//!
//! Value objects, entities, and the seams to the outside world: the
//! persistence/roster collaborators and the transport adapter interface.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod transport;
pub mod value_object;

pub use entity::{
    ChatRoom, Connection, Message, MessageSubmission, MessageTarget, PresenceEvent, TransportKind,
};
pub use error::{RepositoryError, TransportError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{MessageRepository, RosterRepository};
#[cfg(test)]
pub use repository::{MockMessageRepository, MockRosterRepository};
pub use transport::TransportAdapter;
pub use value_object::{
    ConnectionId, CorrelationId, EmployeeId, MessageContent, MessageId, RoomId, Timestamp,
};
