//! Core domain + pipeline logic for the cartoon bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the remote
//! transform provider live behind ports (traits) implemented in adapter
//! crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod pipeline;
pub mod ports;

pub use errors::{Error, Result};
