//! Eventdesk Team Access
//!
//! Roles, permissions, and per-region access toggles for organizer teams,
//! plus the invitation and membership rules that admit people into a team.

pub mod config;
pub mod error;
pub mod permissions;
pub mod team;
pub mod telemetry;

pub use config::Config;
pub use error::{AccessError, AccessResult, ErrorKind};
