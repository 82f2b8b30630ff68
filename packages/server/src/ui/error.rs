//! Server startup errors.

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to seed chat store: {0}")]
    Seed(#[from] RepositoryError),
}
