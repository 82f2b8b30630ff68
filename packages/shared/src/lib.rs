//! Shared utilities for Staffchat binaries and tests.

pub mod logger;
pub mod time;
