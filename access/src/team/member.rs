//! Team member records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::invitation::TeamMemberInvitation;
use crate::permissions::{PermissionSet, RegionCode, RegionalAccessGrid, Role};

/// Identity and locale fields of a team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MemberProfile {
    /// Display name (1-100 characters).
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Contact email.
    #[validate(email)]
    pub email: String,
    /// Contact phone number.
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    /// BCP 47 locale tag, e.g. `en-US`.
    #[validate(length(min = 2, max = 35))]
    pub locale: String,
    /// Home country.
    pub country: Option<RegionCode>,
    /// Free-form sub-national region or state.
    #[validate(length(max = 100))]
    pub region: Option<String>,
    /// IANA timezone name.
    #[validate(length(min = 1, max = 64))]
    pub timezone: String,
}

impl MemberProfile {
    /// Profile with defaults for everything but name and email.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            locale: "en-US".to_string(),
            country: None,
            region: None,
            timezone: "UTC".to_string(),
        }
    }
}

/// Profile edit. Every mutable profile field, nothing else.
///
/// Role, permissions, and regional access have their own operations.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTeamMemberRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 2, max = 35))]
    pub locale: Option<String>,
    pub country: Option<RegionCode>,
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
}

impl UpdateTeamMemberRequest {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.locale.is_none()
            && self.country.is_none()
            && self.region.is_none()
            && self.timezone.is_none()
    }
}

/// Kind of activity recorded against a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    Action,
}

/// Activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityStats {
    pub login_count: u64,
    pub total_actions: u64,
}

/// A principal's membership in one organizer's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub user_id: Uuid,
    pub profile: MemberProfile,
    pub role: Role,
    pub permissions: PermissionSet,
    pub regional_access: RegionalAccessGrid,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub activity: ActivityStats,
    pub is_active: bool,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl TeamMember {
    fn new(
        organizer_id: Uuid,
        user_id: Uuid,
        profile: MemberProfile,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            organizer_id,
            user_id,
            profile,
            role,
            permissions: role.default_permissions(),
            regional_access: role.default_regional_access(),
            invited_by: None,
            joined_at: now,
            last_active_at: None,
            activity: ActivityStats::default(),
            is_active: true,
            removed_at: None,
            removed_by: None,
        }
    }

    /// The organizer's owner record.
    #[must_use]
    pub fn owner(
        organizer_id: Uuid,
        user_id: Uuid,
        profile: MemberProfile,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(organizer_id, user_id, profile, Role::Owner, now)
    }

    /// Member created by accepting `invitation`.
    ///
    /// Takes the invitation's proposed role, permissions, and grid as-is.
    #[must_use]
    pub fn from_invitation(
        invitation: &TeamMemberInvitation,
        user_id: Uuid,
        profile: MemberProfile,
        now: DateTime<Utc>,
    ) -> Self {
        let mut member = Self::new(invitation.organizer_id, user_id, profile, invitation.role, now);
        member.permissions = invitation.permissions;
        member.regional_access = invitation.regional_access.clone();
        member.invited_by = Some(invitation.invited_by);
        member
    }

    /// Whether the permission set differs from the role's defaults.
    #[must_use]
    pub fn has_custom_permissions(&self) -> bool {
        self.permissions != self.role.default_permissions()
    }

    /// Assign a new role and re-resolve permissions and regional access.
    ///
    /// Custom grants and regional overrides are discarded.
    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.permissions = role.default_permissions();
        self.regional_access = role.default_regional_access();
    }

    /// Apply a profile edit. Role, permissions, and grid are untouched.
    pub fn apply_update(&mut self, update: UpdateTeamMemberRequest) {
        if let Some(name) = update.name {
            self.profile.name = name;
        }
        if let Some(phone) = update.phone {
            self.profile.phone = if phone.is_empty() { None } else { Some(phone) };
        }
        if let Some(locale) = update.locale {
            self.profile.locale = locale;
        }
        if let Some(country) = update.country {
            self.profile.country = Some(country);
        }
        if let Some(region) = update.region {
            self.profile.region = if region.is_empty() { None } else { Some(region) };
        }
        if let Some(timezone) = update.timezone {
            self.profile.timezone = timezone;
        }
    }

    /// Count an activity and bump the last-active timestamp.
    pub fn record_activity(&mut self, kind: ActivityKind, now: DateTime<Utc>) {
        match kind {
            ActivityKind::Login => self.activity.login_count += 1,
            ActivityKind::Action => self.activity.total_actions += 1,
        }
        if self.last_active_at.is_none_or(|last| now > last) {
            self.last_active_at = Some(now);
        }
    }

    /// Logically delete the member. Returns `false` if already removed.
    pub fn deactivate(&mut self, removed_by: Uuid, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.removed_at = Some(now);
        self.removed_by = Some(removed_by);
        true
    }
}
