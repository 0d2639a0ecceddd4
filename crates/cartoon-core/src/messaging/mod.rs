//! Messaging port and shared types.

pub mod port;
pub mod types;
