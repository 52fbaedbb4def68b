//! Team roles.
//!
//! Roles form a privilege hierarchy:
//!
//! ```text
//! Owner > Admin > Manager > { Editor, Viewer } > Staff
//! ```
//!
//! Editor and Viewer are siblings: neither outranks the other.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::defaults::{default_permissions_for, default_regional_access_for};
use super::permission::PermissionSet;
use super::regional::RegionalAccessGrid;

/// A team member's privilege tier within one organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Organizer account holder. Exactly one per organizer.
    Owner,
    /// Full operational control, including team and settings.
    Admin,
    /// Runs events, attendees and marketing.
    Manager,
    /// Edits event content.
    Editor,
    /// Read-only access to attendees, analytics and support.
    Viewer,
    /// On-site staff: check-in and support.
    Staff,
}

impl Role {
    /// Returns every role, most privileged first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Owner,
            Self::Admin,
            Self::Manager,
            Self::Editor,
            Self::Viewer,
            Self::Staff,
        ]
    }

    /// Returns the snake_case name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
            Self::Staff => "staff",
        }
    }

    /// Privilege tier. Siblings share a tier.
    const fn tier(self) -> u8 {
        match self {
            Self::Owner => 4,
            Self::Admin => 3,
            Self::Manager => 2,
            Self::Editor | Self::Viewer => 1,
            Self::Staff => 0,
        }
    }

    /// Whether this role is strictly more privileged than `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ev_access::permissions::Role;
    ///
    /// assert!(Role::Admin.outranks(Role::Viewer));
    /// assert!(!Role::Editor.outranks(Role::Viewer));
    /// assert!(!Role::Viewer.outranks(Role::Editor));
    /// ```
    #[must_use]
    pub fn outranks(self, other: Self) -> bool {
        self.partial_cmp(&other) == Some(Ordering::Greater)
    }

    /// Default permission set for this role.
    #[must_use]
    pub const fn default_permissions(self) -> PermissionSet {
        default_permissions_for(self)
    }

    /// Default regional access grid for this role.
    #[must_use]
    pub fn default_regional_access(self) -> RegionalAccessGrid {
        default_regional_access_for(self)
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match self.tier().cmp(&other.tier()) {
            Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role name that is not part of the catalog.
///
/// Treated as a programming error: stored data references a role this
/// build does not know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRoleError(s.to_string()))
    }
}
