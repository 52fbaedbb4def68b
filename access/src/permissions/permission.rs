//! Fine-grained team permissions.
//!
//! [`Permission`] names a single capability; [`PermissionSet`] is the
//! bitfield a team member actually holds. Bit positions are stable and
//! persisted, so new permissions must only ever be appended.
//!
//! - Events (bits 0-3)
//! - Attendees (bits 4-6)
//! - Finance (bit 7)
//! - Marketing (bits 8-9)
//! - Team (bits 10-11)
//! - Analytics (bits 12-13)
//! - Settings (bit 14)
//! - Support (bits 15-16)

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use super::regional::AccessArea;

/// A single organization-wide capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create draft events
    CreateEvents,
    /// Edit existing events
    EditEvents,
    /// Delete events
    DeleteEvents,
    /// Publish events to the public listing
    PublishEvents,
    /// View attendee lists and registrations
    ViewAttendees,
    /// Edit, refund, or cancel attendee registrations
    ManageAttendees,
    /// Check attendees in at the venue
    CheckInAttendees,
    /// View revenue, payouts, and invoices
    ViewFinancials,
    /// Send emails to attendees
    SendEmails,
    /// Create and manage marketing campaigns
    ManageCampaigns,
    /// Invite new team members
    InviteTeamMembers,
    /// Change roles, permissions, and regional access of team members
    ManageRoles,
    /// View analytics dashboards
    ViewAnalytics,
    /// Export reports
    ExportReports,
    /// Modify organizer settings
    ManageOrganizerSettings,
    /// Read support messages
    ViewSupportMessages,
    /// Reply to support messages
    ReplyToSupport,
}

impl Permission {
    /// Returns the action name used in audit logs and on the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use ev_access::permissions::Permission;
    ///
    /// assert_eq!(Permission::ManageRoles.action_name(), "manage_roles");
    /// ```
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::CreateEvents => "create_events",
            Self::EditEvents => "edit_events",
            Self::DeleteEvents => "delete_events",
            Self::PublishEvents => "publish_events",
            Self::ViewAttendees => "view_attendees",
            Self::ManageAttendees => "manage_attendees",
            Self::CheckInAttendees => "check_in_attendees",
            Self::ViewFinancials => "view_financials",
            Self::SendEmails => "send_emails",
            Self::ManageCampaigns => "manage_campaigns",
            Self::InviteTeamMembers => "invite_team_members",
            Self::ManageRoles => "manage_roles",
            Self::ViewAnalytics => "view_analytics",
            Self::ExportReports => "export_reports",
            Self::ManageOrganizerSettings => "manage_organizer_settings",
            Self::ViewSupportMessages => "view_support_messages",
            Self::ReplyToSupport => "reply_to_support",
        }
    }

    /// Returns every permission, in bit order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CreateEvents,
            Self::EditEvents,
            Self::DeleteEvents,
            Self::PublishEvents,
            Self::ViewAttendees,
            Self::ManageAttendees,
            Self::CheckInAttendees,
            Self::ViewFinancials,
            Self::SendEmails,
            Self::ManageCampaigns,
            Self::InviteTeamMembers,
            Self::ManageRoles,
            Self::ViewAnalytics,
            Self::ExportReports,
            Self::ManageOrganizerSettings,
            Self::ViewSupportMessages,
            Self::ReplyToSupport,
        ]
    }

    /// Returns a human-readable description of the permission.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CreateEvents => "Create new events",
            Self::EditEvents => "Edit existing events",
            Self::DeleteEvents => "Delete events",
            Self::PublishEvents => "Publish events",
            Self::ViewAttendees => "View attendees",
            Self::ManageAttendees => "Manage attendee registrations",
            Self::CheckInAttendees => "Check in attendees on site",
            Self::ViewFinancials => "View financial reports",
            Self::SendEmails => "Send emails to attendees",
            Self::ManageCampaigns => "Manage marketing campaigns",
            Self::InviteTeamMembers => "Invite team members",
            Self::ManageRoles => "Manage team roles and access",
            Self::ViewAnalytics => "View analytics",
            Self::ExportReports => "Export reports",
            Self::ManageOrganizerSettings => "Manage organizer settings",
            Self::ViewSupportMessages => "View support messages",
            Self::ReplyToSupport => "Reply to support messages",
        }
    }

    /// The regional capability area gating this permission.
    #[must_use]
    pub const fn area(&self) -> AccessArea {
        match self {
            Self::CreateEvents | Self::EditEvents | Self::DeleteEvents | Self::PublishEvents => {
                AccessArea::Events
            }
            Self::ViewAttendees | Self::ManageAttendees | Self::CheckInAttendees => {
                AccessArea::Attendees
            }
            Self::ViewFinancials => AccessArea::Finances,
            Self::SendEmails | Self::ManageCampaigns => AccessArea::Marketing,
            Self::InviteTeamMembers | Self::ManageRoles => AccessArea::Team,
            Self::ViewAnalytics | Self::ExportReports => AccessArea::Analytics,
            Self::ManageOrganizerSettings => AccessArea::Settings,
            Self::ViewSupportMessages | Self::ReplyToSupport => AccessArea::Support,
        }
    }

    /// The single-bit [`PermissionSet`] for this permission.
    #[must_use]
    pub const fn flag(self) -> PermissionSet {
        match self {
            Self::CreateEvents => PermissionSet::CREATE_EVENTS,
            Self::EditEvents => PermissionSet::EDIT_EVENTS,
            Self::DeleteEvents => PermissionSet::DELETE_EVENTS,
            Self::PublishEvents => PermissionSet::PUBLISH_EVENTS,
            Self::ViewAttendees => PermissionSet::VIEW_ATTENDEES,
            Self::ManageAttendees => PermissionSet::MANAGE_ATTENDEES,
            Self::CheckInAttendees => PermissionSet::CHECK_IN_ATTENDEES,
            Self::ViewFinancials => PermissionSet::VIEW_FINANCIALS,
            Self::SendEmails => PermissionSet::SEND_EMAILS,
            Self::ManageCampaigns => PermissionSet::MANAGE_CAMPAIGNS,
            Self::InviteTeamMembers => PermissionSet::INVITE_TEAM_MEMBERS,
            Self::ManageRoles => PermissionSet::MANAGE_ROLES,
            Self::ViewAnalytics => PermissionSet::VIEW_ANALYTICS,
            Self::ExportReports => PermissionSet::EXPORT_REPORTS,
            Self::ManageOrganizerSettings => PermissionSet::MANAGE_ORGANIZER_SETTINGS,
            Self::ViewSupportMessages => PermissionSet::VIEW_SUPPORT_MESSAGES,
            Self::ReplyToSupport => PermissionSet::REPLY_TO_SUPPORT,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

/// A permission name that is not part of the catalog.
///
/// Seeing this means stored data and code have drifted apart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermissionError(pub String);

impl FromStr for Permission {
    type Err = UnknownPermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.action_name() == s)
            .ok_or_else(|| UnknownPermissionError(s.to_string()))
    }
}

bitflags! {
    /// Permissions held by a team member, as a 64-bit bitfield.
    ///
    /// Stored as BIGINT by the persistence layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct PermissionSet: u64 {
        // === Events (bits 0-3) ===
        const CREATE_EVENTS             = 1 << 0;
        const EDIT_EVENTS               = 1 << 1;
        const DELETE_EVENTS             = 1 << 2;
        const PUBLISH_EVENTS            = 1 << 3;

        // === Attendees (bits 4-6) ===
        const VIEW_ATTENDEES            = 1 << 4;
        const MANAGE_ATTENDEES          = 1 << 5;
        const CHECK_IN_ATTENDEES        = 1 << 6;

        // === Finance (bit 7) ===
        const VIEW_FINANCIALS           = 1 << 7;

        // === Marketing (bits 8-9) ===
        const SEND_EMAILS               = 1 << 8;
        const MANAGE_CAMPAIGNS          = 1 << 9;

        // === Team (bits 10-11) ===
        const INVITE_TEAM_MEMBERS       = 1 << 10;
        const MANAGE_ROLES              = 1 << 11;

        // === Analytics (bits 12-13) ===
        const VIEW_ANALYTICS            = 1 << 12;
        const EXPORT_REPORTS            = 1 << 13;

        // === Settings (bit 14) ===
        const MANAGE_ORGANIZER_SETTINGS = 1 << 14;

        // === Support (bits 15-16) ===
        const VIEW_SUPPORT_MESSAGES     = 1 << 15;
        const REPLY_TO_SUPPORT          = 1 << 16;
    }
}

impl PermissionSet {
    /// Permissions that change event content.
    pub const EVENT_WRITE: Self = Self::CREATE_EVENTS
        .union(Self::EDIT_EVENTS)
        .union(Self::DELETE_EVENTS);

    // === Database Conversion ===

    /// Create a permission set from a database BIGINT value.
    ///
    /// Unknown bits are dropped so rows written by a newer release still load.
    #[must_use]
    pub const fn from_db(value: i64) -> Self {
        Self::from_bits_truncate(value as u64)
    }

    /// Convert the set to a database BIGINT value.
    #[must_use]
    pub const fn to_db(self) -> i64 {
        self.bits() as i64
    }

    // === Permission Checking ===

    /// Check whether the set includes a single permission.
    ///
    /// # Examples
    ///
    /// ```
    /// use ev_access::permissions::{Permission, PermissionSet};
    ///
    /// let perms = PermissionSet::VIEW_ATTENDEES | PermissionSet::VIEW_ANALYTICS;
    /// assert!(perms.has(Permission::ViewAttendees));
    /// assert!(!perms.has(Permission::DeleteEvents));
    /// ```
    #[must_use]
    pub const fn has(self, permission: Permission) -> bool {
        self.contains(permission.flag())
    }

    /// Add a single permission.
    pub fn grant(&mut self, permission: Permission) {
        self.insert(permission.flag());
    }

    /// Remove a single permission.
    pub fn revoke(&mut self, permission: Permission) {
        self.remove(permission.flag());
    }

    /// The permissions in this set, in bit order.
    pub fn permissions(self) -> impl Iterator<Item = Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(move |p| self.has(*p))
    }

    /// Number of permissions in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        permission.flag()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, p| set.union(p.flag()))
    }
}
