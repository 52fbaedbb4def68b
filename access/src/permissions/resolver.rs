//! Access decisions.
//!
//! Combines a member's permission set with their regional access grid.
//! Both gates must pass: a permission held organization-wide is still
//! denied in a region whose toggle for that permission's area is off.

use uuid::Uuid;

use super::permission::{Permission, PermissionSet};
use super::regional::{AccessArea, AccessToggles, RegionCode};
use super::role::Role;
use crate::error::AccessError;
use crate::team::TeamMember;

/// Check whether the member's permission set contains `permission`.
///
/// The stored set is authoritative: a permission revoked after role
/// assignment is gone even though the role would normally imply it.
#[must_use]
pub const fn has_permission(member: &TeamMember, permission: Permission) -> bool {
    member.permissions.has(permission)
}

/// Toggles that apply to `member` in `region`.
///
/// Exact region first, then `*`, then no access.
#[must_use]
pub fn regional_access(member: &TeamMember, region: &RegionCode) -> AccessToggles {
    member.regional_access.resolve(region)
}

/// Authorize `permission` for `member` in `region`.
///
/// Requires, in order:
/// 1. The member is active
/// 2. The member holds the permission
/// 3. The region's toggle for the permission's area is on
pub fn authorize(
    member: &TeamMember,
    permission: Permission,
    region: &RegionCode,
) -> Result<(), PermissionError> {
    require_permission(member, permission)?;

    let area = permission.area();
    if !regional_access(member, region).allows(area) {
        return Err(PermissionError::RegionDenied {
            permission,
            area,
            region: region.clone(),
        });
    }

    Ok(())
}

/// Boolean form of [`authorize`].
#[must_use]
pub fn is_authorized(member: &TeamMember, permission: Permission, region: &RegionCode) -> bool {
    authorize(member, permission, region).is_ok()
}

/// Require an active member holding `permission`, ignoring regions.
pub fn require_permission(
    member: &TeamMember,
    permission: Permission,
) -> Result<(), PermissionError> {
    if !member.is_active {
        return Err(PermissionError::InactiveMember);
    }
    if !has_permission(member, permission) {
        return Err(PermissionError::MissingPermission(permission));
    }
    Ok(())
}

/// Require that `actor` belongs to the organizer that owns the target.
///
/// A mismatch is an authorization failure, not a permission or validation
/// failure.
pub fn require_same_organizer(actor: &TeamMember, organizer_id: Uuid) -> Result<(), AccessError> {
    if actor.organizer_id == organizer_id {
        Ok(())
    } else {
        Err(AccessError::unauthorized(
            "Team member belongs to a different organizer",
        ))
    }
}

/// Check whether a member with `actor_role` may hand out `target_role`.
///
/// Rules:
/// 1. Nobody can assign Owner
/// 2. The actor must strictly outrank the role being assigned
pub fn can_assign_role(actor_role: Role, target_role: Role) -> Result<(), PermissionError> {
    if target_role == Role::Owner {
        return Err(PermissionError::CannotModifyOwner);
    }
    if !actor_role.outranks(target_role) {
        return Err(PermissionError::RoleHierarchy {
            actor: actor_role,
            target: target_role,
        });
    }
    Ok(())
}

/// Check whether `actor` may change or remove `target`.
///
/// Rules:
/// 1. The Owner cannot be modified
/// 2. The actor must strictly outrank the target (so never themselves)
pub fn can_manage_member(actor: &TeamMember, target: &TeamMember) -> Result<(), PermissionError> {
    if target.role == Role::Owner {
        return Err(PermissionError::CannotModifyOwner);
    }
    if !actor.role.outranks(target.role) {
        return Err(PermissionError::RoleHierarchy {
            actor: actor.role,
            target: target.role,
        });
    }
    Ok(())
}

/// Reject grants of permissions the actor does not hold.
pub fn check_escalation(
    actor_permissions: PermissionSet,
    requested: PermissionSet,
) -> Result<(), PermissionError> {
    let escalation = requested.difference(actor_permissions);
    if escalation.is_empty() {
        Ok(())
    } else {
        Err(PermissionError::CannotEscalate(escalation))
    }
}

/// Permission check errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// Member lacks the permission.
    #[error("Missing permission: {0}")]
    MissingPermission(Permission),

    /// Member holds the permission but the region gates the area off.
    #[error("No {area} access in region {region} (required for {permission})")]
    RegionDenied {
        permission: Permission,
        area: AccessArea,
        region: RegionCode,
    },

    /// Role hierarchy violation.
    #[error("Cannot assign or modify role {target} (your role: {actor})")]
    RoleHierarchy { actor: Role, target: Role },

    /// Attempted to grant permissions not held.
    #[error("Cannot grant permissions you don't have: {0:?}")]
    CannotEscalate(PermissionSet),

    /// Attempted to assign, change, or remove the Owner.
    #[error("Cannot modify the organizer owner")]
    CannotModifyOwner,

    /// Member was removed from the team.
    #[error("Team member is not active")]
    InactiveMember,
}
