//! Infrastructure layer: live-state registries, transport adapters,
//! collaborator implementations, and wire DTOs.

pub mod dto;
pub mod registry;
pub mod repository;
pub mod transport;
