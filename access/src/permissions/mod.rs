//! Team permission model.
//!
//! Two gates decide every action:
//! - Permissions: organization-wide capabilities held by a member
//! - Regional access: per-country (or wildcard) toggles per capability area
//!
//! Roles only supply defaults for both; the member's stored set and grid
//! are what the resolver checks.

pub mod defaults;
pub mod permission;
pub mod regional;
pub mod resolver;
pub mod role;

pub use defaults::{default_permissions_for, default_regional_access_for, default_toggles_for};
pub use permission::{Permission, PermissionSet, UnknownPermissionError};
pub use regional::{AccessArea, AccessToggles, InvalidRegionCode, RegionCode, RegionalAccessGrid};
pub use resolver::{
    authorize, can_assign_role, can_manage_member, check_escalation, has_permission,
    is_authorized, regional_access, require_permission, require_same_organizer, PermissionError,
};
pub use role::{Role, UnknownRoleError};
