//! Eventdesk Common Library
//!
//! Plain records owned by external collaborators (the organizer directory)
//! and consumed by the team access library.

pub mod types;

pub use types::*;
