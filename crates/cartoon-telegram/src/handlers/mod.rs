//! Telegram update handlers.
//!
//! Photos go through the cartoon pipeline; every other message type gets
//! the static prompt. Fatal handler errors are routed to the fault boundary
//! in `router`.

mod other;
mod photo;

pub use other::handle_other;
pub use photo::handle_photo;
