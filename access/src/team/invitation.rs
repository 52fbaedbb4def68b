//! Team invitations.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::member::MemberProfile;
use crate::permissions::{PermissionSet, RegionalAccessGrid, Role};

/// Invitations are accepted for this many days after creation.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Lifecycle state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invitation request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[validate(length(min = 1, max = 254), email)]
    pub email: String,
    pub role: Role,
    /// Explicit permission set; `None` means the role's defaults.
    pub permissions: Option<PermissionSet>,
    /// Explicit regional grid; `None` means the role's defaults.
    pub regional_access: Option<RegionalAccessGrid>,
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

impl CreateInvitationRequest {
    /// Invite `email` with the role's default permissions and grid.
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
            permissions: None,
            regional_access: None,
            message: None,
        }
    }
}

/// Acceptance request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AcceptInvitationRequest {
    pub user_id: Uuid,
    #[validate(nested)]
    pub profile: MemberProfile,
}

/// A pending, accepted, expired, or revoked invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberInvitation {
    pub id: Uuid,
    pub organizer_id: Uuid,
    /// Lowercased.
    pub email: String,
    pub role: Role,
    pub permissions: PermissionSet,
    pub regional_access: RegionalAccessGrid,
    pub invited_by: Uuid,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Stored status. Expiry is not written back; see [`Self::status_at`].
    pub status: InvitationStatus,
    pub responded_at: Option<DateTime<Utc>>,
}

impl TeamMemberInvitation {
    /// Build a pending invitation from a validated request.
    #[must_use]
    pub fn new(
        organizer_id: Uuid,
        invited_by: Uuid,
        request: CreateInvitationRequest,
        now: DateTime<Utc>,
    ) -> Self {
        let role = request.role;
        Self {
            id: Uuid::now_v7(),
            organizer_id,
            email: normalize_email(&request.email),
            role,
            permissions: request
                .permissions
                .unwrap_or_else(|| role.default_permissions()),
            regional_access: request
                .regional_access
                .unwrap_or_else(|| role.default_regional_access()),
            invited_by,
            message: request.message,
            created_at: now,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            status: InvitationStatus::Pending,
            responded_at: None,
        }
    }

    /// Expired strictly after `expires_at`; the boundary instant is still valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Effective status at `now`. A pending invitation past its window reads
    /// as expired.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> InvitationStatus {
        match self.status {
            InvitationStatus::Pending if self.is_expired_at(now) => InvitationStatus::Expired,
            status => status,
        }
    }

    /// Whether `email` is the invited address, ignoring case.
    #[must_use]
    pub fn is_for_email(&self, email: &str) -> bool {
        self.email == normalize_email(email)
    }

    pub fn mark_accepted(&mut self, now: DateTime<Utc>) {
        self.status = InvitationStatus::Accepted;
        self.responded_at = Some(now);
    }

    pub fn revoke(&mut self, now: DateTime<Utc>) {
        self.status = InvitationStatus::Revoked;
        self.responded_at = Some(now);
    }
}

/// Trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permission;

    fn invitation(now: DateTime<Utc>) -> TeamMemberInvitation {
        TeamMemberInvitation::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            CreateInvitationRequest::new("  New.Hire@Example.COM ", Role::Editor),
            now,
        )
    }

    #[test]
    fn test_new_uses_role_defaults() {
        let invite = invitation(Utc::now());

        assert_eq!(invite.email, "new.hire@example.com");
        assert_eq!(invite.permissions, PermissionSet::EDITOR_DEFAULT);
        assert_eq!(invite.regional_access, Role::Editor.default_regional_access());
        assert_eq!(invite.status, InvitationStatus::Pending);
        assert_eq!(invite.responded_at, None);
    }

    #[test]
    fn test_new_keeps_explicit_permissions() {
        let mut request = CreateInvitationRequest::new("a@example.com", Role::Staff);
        request.permissions = Some(PermissionSet::VIEW_ATTENDEES);

        let invite = TeamMemberInvitation::new(Uuid::now_v7(), Uuid::now_v7(), request, Utc::now());

        assert_eq!(invite.permissions, Permission::ViewAttendees.flag());
        assert_eq!(invite.regional_access, Role::Staff.default_regional_access());
    }

    #[test]
    fn test_expires_after_seven_days() {
        let now = Utc::now();
        let invite = invitation(now);

        assert_eq!(invite.expires_at - invite.created_at, Duration::days(7));
        assert!(!invite.is_expired_at(invite.expires_at));
        assert!(invite.is_expired_at(invite.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_status_is_lazily_expired() {
        let now = Utc::now();
        let invite = invitation(now);

        assert_eq!(invite.status_at(now), InvitationStatus::Pending);
        assert_eq!(
            invite.status_at(now + Duration::days(8)),
            InvitationStatus::Expired
        );
        // Stored status is untouched by the read.
        assert_eq!(invite.status, InvitationStatus::Pending);
    }

    #[test]
    fn test_terminal_states_do_not_expire() {
        let now = Utc::now();
        let mut invite = invitation(now);
        invite.mark_accepted(now + Duration::hours(1));

        assert_eq!(
            invite.status_at(now + Duration::days(30)),
            InvitationStatus::Accepted
        );
        assert_eq!(invite.responded_at, Some(now + Duration::hours(1)));

        let mut revoked = invitation(now);
        revoked.revoke(now);
        assert_eq!(
            revoked.status_at(now + Duration::days(30)),
            InvitationStatus::Revoked
        );
        assert!(InvitationStatus::Revoked.is_terminal());
        assert!(!InvitationStatus::Pending.is_terminal());
    }

    #[test]
    fn test_email_match_ignores_case() {
        let invite = invitation(Utc::now());
        assert!(invite.is_for_email("NEW.HIRE@example.com"));
        assert!(!invite.is_for_email("someone.else@example.com"));
    }

    #[test]
    fn test_request_validation() {
        assert!(CreateInvitationRequest::new("ok@example.com", Role::Viewer)
            .validate()
            .is_ok());
        assert!(CreateInvitationRequest::new("", Role::Viewer)
            .validate()
            .is_err());
        assert!(CreateInvitationRequest::new("no-at-sign", Role::Viewer)
            .validate()
            .is_err());

        let mut long_message = CreateInvitationRequest::new("ok@example.com", Role::Viewer);
        long_message.message = Some("x".repeat(501));
        assert!(long_message.validate().is_err());
    }

    #[test]
    fn test_accept_request_validates_profile() {
        let request = AcceptInvitationRequest {
            user_id: Uuid::now_v7(),
            profile: MemberProfile::new("", "ok@example.com"),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Revoked).unwrap(),
            "\"revoked\""
        );
        assert_eq!(InvitationStatus::Expired.to_string(), "expired");
    }
}
