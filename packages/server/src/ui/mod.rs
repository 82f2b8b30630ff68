//! Staff messaging server: router, handlers, and server lifecycle.

pub mod config;
pub mod error;
mod eviction;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use config::ServerArgs;
pub use error::ServerError;
pub use runner::{create_app, run, serve};
