//! Shared record types.

pub mod organizer;

pub use organizer::*;
