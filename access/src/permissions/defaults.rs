//! Role defaults.
//!
//! Every preset is an explicit list. Nothing is derived from another role or
//! from "all minus X", so a newly added permission is granted to no role
//! except Owner until someone adds it here on purpose.

use super::permission::PermissionSet;
use super::regional::{AccessToggles, RegionalAccessGrid};
use super::role::Role;

impl PermissionSet {
    /// Owner: the whole permission universe.
    pub const OWNER_DEFAULT: Self = Self::all();

    /// Admin: every operational permission except on-site check-in.
    pub const ADMIN_DEFAULT: Self = Self::CREATE_EVENTS
        .union(Self::EDIT_EVENTS)
        .union(Self::DELETE_EVENTS)
        .union(Self::PUBLISH_EVENTS)
        .union(Self::VIEW_ATTENDEES)
        .union(Self::MANAGE_ATTENDEES)
        .union(Self::VIEW_FINANCIALS)
        .union(Self::SEND_EMAILS)
        .union(Self::MANAGE_CAMPAIGNS)
        .union(Self::INVITE_TEAM_MEMBERS)
        .union(Self::MANAGE_ROLES)
        .union(Self::VIEW_ANALYTICS)
        .union(Self::EXPORT_REPORTS)
        .union(Self::MANAGE_ORGANIZER_SETTINGS)
        .union(Self::VIEW_SUPPORT_MESSAGES)
        .union(Self::REPLY_TO_SUPPORT);

    /// Manager: events, attendees, marketing, analytics and support.
    pub const MANAGER_DEFAULT: Self = Self::CREATE_EVENTS
        .union(Self::EDIT_EVENTS)
        .union(Self::PUBLISH_EVENTS)
        .union(Self::VIEW_ATTENDEES)
        .union(Self::MANAGE_ATTENDEES)
        .union(Self::SEND_EMAILS)
        .union(Self::MANAGE_CAMPAIGNS)
        .union(Self::VIEW_ANALYTICS)
        .union(Self::EXPORT_REPORTS)
        .union(Self::VIEW_SUPPORT_MESSAGES)
        .union(Self::REPLY_TO_SUPPORT);

    /// Editor: currently the same list as Manager.
    pub const EDITOR_DEFAULT: Self = Self::CREATE_EVENTS
        .union(Self::EDIT_EVENTS)
        .union(Self::PUBLISH_EVENTS)
        .union(Self::VIEW_ATTENDEES)
        .union(Self::MANAGE_ATTENDEES)
        .union(Self::SEND_EMAILS)
        .union(Self::MANAGE_CAMPAIGNS)
        .union(Self::VIEW_ANALYTICS)
        .union(Self::EXPORT_REPORTS)
        .union(Self::VIEW_SUPPORT_MESSAGES)
        .union(Self::REPLY_TO_SUPPORT);

    /// Viewer: read-only.
    pub const VIEWER_DEFAULT: Self = Self::VIEW_ATTENDEES
        .union(Self::VIEW_ANALYTICS)
        .union(Self::VIEW_SUPPORT_MESSAGES);

    /// Staff: door and support desk.
    pub const STAFF_DEFAULT: Self = Self::VIEW_ATTENDEES
        .union(Self::CHECK_IN_ATTENDEES)
        .union(Self::VIEW_SUPPORT_MESSAGES)
        .union(Self::REPLY_TO_SUPPORT);
}

impl AccessToggles {
    /// Owner and Admin regional default.
    pub const FULL_DEFAULT: Self = Self::ALL;

    /// Manager and Editor regional default.
    pub const CONTRIBUTOR_DEFAULT: Self = Self {
        events: true,
        finances: false,
        attendees: true,
        marketing: true,
        team: false,
        analytics: true,
        settings: false,
        support: true,
    };

    /// Viewer regional default.
    pub const VIEWER_DEFAULT: Self = Self {
        events: false,
        finances: false,
        attendees: true,
        marketing: false,
        team: false,
        analytics: true,
        settings: false,
        support: true,
    };

    /// Staff regional default.
    pub const STAFF_DEFAULT: Self = Self {
        events: false,
        finances: false,
        attendees: true,
        marketing: false,
        team: false,
        analytics: false,
        settings: false,
        support: true,
    };
}

/// Default permission set for a role.
///
/// Re-resolve whenever a member's role changes.
#[must_use]
pub const fn default_permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::Owner => PermissionSet::OWNER_DEFAULT,
        Role::Admin => PermissionSet::ADMIN_DEFAULT,
        Role::Manager => PermissionSet::MANAGER_DEFAULT,
        Role::Editor => PermissionSet::EDITOR_DEFAULT,
        Role::Viewer => PermissionSet::VIEWER_DEFAULT,
        Role::Staff => PermissionSet::STAFF_DEFAULT,
    }
}

/// Wildcard-only toggles a role starts with.
#[must_use]
pub const fn default_toggles_for(role: Role) -> AccessToggles {
    match role {
        Role::Owner | Role::Admin => AccessToggles::FULL_DEFAULT,
        Role::Manager | Role::Editor => AccessToggles::CONTRIBUTOR_DEFAULT,
        Role::Viewer => AccessToggles::VIEWER_DEFAULT,
        Role::Staff => AccessToggles::STAFF_DEFAULT,
    }
}

/// Default regional access grid for a role.
///
/// Always a single `*` entry; per-country restrictions are applied later as
/// explicit grid updates.
#[must_use]
pub fn default_regional_access_for(role: Role) -> RegionalAccessGrid {
    RegionalAccessGrid::wildcard(default_toggles_for(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{AccessArea, Permission, RegionCode};

    // === Permission Presets ===

    #[test]
    fn test_every_role_has_permissions() {
        for role in Role::all() {
            assert!(
                !default_permissions_for(*role).is_empty(),
                "{role} has no default permissions"
            );
        }
    }

    #[test]
    fn test_defaults_are_deterministic() {
        for role in Role::all() {
            assert_eq!(default_permissions_for(*role), default_permissions_for(*role));
            assert_eq!(
                default_regional_access_for(*role),
                default_regional_access_for(*role)
            );
        }
    }

    #[test]
    fn test_owner_has_everything() {
        for perm in Permission::all() {
            assert!(default_permissions_for(Role::Owner).has(*perm));
        }
    }

    #[test]
    fn test_admin_is_sixteen_explicit_permissions() {
        let admin = default_permissions_for(Role::Admin);
        assert_eq!(admin.count(), 16);
        assert!(!admin.has(Permission::CheckInAttendees));
        assert!(admin.has(Permission::ManageRoles));
        assert!(admin.has(Permission::ManageOrganizerSettings));
        assert!(admin.has(Permission::ViewFinancials));
    }

    #[test]
    fn test_superset_chain() {
        let owner = default_permissions_for(Role::Owner);
        let admin = default_permissions_for(Role::Admin);
        let manager = default_permissions_for(Role::Manager);
        let editor = default_permissions_for(Role::Editor);

        assert!(owner.contains(admin));
        assert!(admin.contains(manager));
        assert!(manager.contains(editor));
    }

    #[test]
    fn test_manager_and_editor_are_identical() {
        assert_eq!(
            default_permissions_for(Role::Manager),
            default_permissions_for(Role::Editor)
        );
    }

    #[test]
    fn test_viewer_has_no_event_writes() {
        let viewer = default_permissions_for(Role::Viewer);
        assert!(!viewer.intersects(PermissionSet::EVENT_WRITE));
        assert!(!viewer.has(Permission::ManageRoles));
        assert!(!viewer.has(Permission::ManageOrganizerSettings));
    }

    #[test]
    fn test_staff_can_check_in() {
        let staff = default_permissions_for(Role::Staff);
        assert!(staff.has(Permission::CheckInAttendees));
        assert!(staff.has(Permission::ReplyToSupport));
        assert!(!staff.has(Permission::ViewAnalytics));
    }

    #[test]
    fn test_team_permissions_reserved_for_admins() {
        for role in [Role::Manager, Role::Editor, Role::Viewer, Role::Staff] {
            let perms = default_permissions_for(role);
            assert!(!perms.has(Permission::InviteTeamMembers), "{role}");
            assert!(!perms.has(Permission::ManageRoles), "{role}");
        }
    }

    #[test]
    fn test_default_permissions_match_regional_areas() {
        // A default permission should never be gated off by the same role's
        // default grid, or the grant is dead on arrival.
        for role in Role::all() {
            let toggles = default_toggles_for(*role);
            for perm in default_permissions_for(*role).permissions() {
                assert!(
                    toggles.allows(perm.area()),
                    "{role} holds {perm} but its {} toggle is off",
                    perm.area()
                );
            }
        }
    }

    // === Regional Presets ===

    #[test]
    fn test_regional_defaults_are_wildcard_only() {
        for role in Role::all() {
            let grid = default_regional_access_for(*role);
            assert_eq!(grid.len(), 1);
            assert!(grid.get(&RegionCode::wildcard()).is_some());
        }
    }

    #[test]
    fn test_regional_toggle_counts() {
        let count = |role| default_toggles_for(role).enabled_count();
        assert_eq!(count(Role::Owner), 8);
        assert_eq!(count(Role::Admin), 8);
        assert_eq!(count(Role::Manager), 5);
        assert_eq!(count(Role::Editor), 5);
        assert_eq!(count(Role::Viewer), 3);
        assert_eq!(count(Role::Staff), 2);
    }

    #[test]
    fn test_contributor_toggles() {
        let toggles = default_toggles_for(Role::Editor);
        assert_eq!(
            toggles.enabled_areas().collect::<Vec<_>>(),
            vec![
                AccessArea::Events,
                AccessArea::Attendees,
                AccessArea::Marketing,
                AccessArea::Analytics,
                AccessArea::Support,
            ]
        );
    }

    #[test]
    fn test_viewer_and_staff_toggles() {
        assert_eq!(
            AccessToggles::VIEWER_DEFAULT,
            AccessToggles::only(&[
                AccessArea::Attendees,
                AccessArea::Analytics,
                AccessArea::Support
            ])
        );
        assert_eq!(
            AccessToggles::STAFF_DEFAULT,
            AccessToggles::only(&[AccessArea::Attendees, AccessArea::Support])
        );
    }
}
