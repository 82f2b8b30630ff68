//! Domain layer error definitions.

use thiserror::Error;

use super::{
    entity::TransportKind,
    value_object::{EmployeeId, RoomId},
};

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// EmployeeId must be a positive integer
    #[error("EmployeeId must be positive (got {0})")]
    EmployeeIdNotPositive(i64),

    /// RoomId must be a positive integer
    #[error("RoomId must be positive (got {0})")]
    RoomIdNotPositive(i64),

    /// MessageId must be a positive integer
    #[error("MessageId must be positive (got {0})")]
    MessageIdNotPositive(i64),

    /// ConnectionId invalid format error (not a valid UUID format)
    #[error("ConnectionId must be a valid UUID format (got: {0})")]
    ConnectionIdInvalidFormat(String),

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// CorrelationId validation error
    #[error("CorrelationId cannot be empty")]
    CorrelationIdEmpty,

    /// CorrelationId too long error
    #[error("CorrelationId cannot exceed {max} bytes (got {actual})")]
    CorrelationIdTooLong { max: usize, actual: usize },
}

/// Errors returned by the persistence and roster collaborators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("chat room {0} not found")]
    RoomNotFound(RoomId),

    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// The backing store could not serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a transport adapter when writing to its connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection's outbound side is gone (closed socket, dropped stream)
    #[error("{0} connection is closed")]
    Closed(TransportKind),
}
