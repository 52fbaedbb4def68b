//! Storage seams.
//!
//! The service talks to persistence only through these traits. Any backend
//! works as long as [`TeamStore::admit_member`] checks its claim, counts, and
//! inserts in one atomic step, and [`TeamStore::revoke_invitation`] is a
//! compare-and-swap on the pending status.

use chrono::{DateTime, Utc};
use ev_common::OrganizerSettings;
use uuid::Uuid;

use super::invitation::{InvitationStatus, TeamMemberInvitation};
use super::member::TeamMember;
use super::policy::TeamSizeLimit;

/// Backend failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("write conflict: {0}")]
    Conflict(String),
}

/// What entitles a new member to a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionClaim {
    /// First owner of an organizer. Refused once an active owner exists.
    Owner,
    /// A pending invitation, consumed (pending to accepted) on admission.
    Invitation {
        invitation_id: Uuid,
        now: DateTime<Utc>,
    },
}

/// Outcome of an atomic admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// The organizer was already full at commit time.
    LimitReached { active_members: u64 },
    /// The user already holds an active membership in this organizer.
    AlreadyMember,
    /// An active owner already exists.
    OwnerExists,
    /// The invitation was no longer pending at commit time.
    InvitationNotPending(InvitationStatus),
}

/// Outcome of a revoke attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revocation {
    Revoked(TeamMemberInvitation),
    /// Effective status at the time of the attempt.
    NotPending(InvitationStatus),
}

/// Read access to organizer settings.
pub trait OrganizerDirectory: Send + Sync {
    fn organizer_settings(&self, organizer_id: Uuid)
        -> Result<Option<OrganizerSettings>, StoreError>;
}

/// Team members and invitations.
pub trait TeamStore: Send + Sync {
    fn member(&self, member_id: Uuid) -> Result<Option<TeamMember>, StoreError>;

    /// Active membership of `user_id` in `organizer_id`.
    fn member_by_user(
        &self,
        organizer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMember>, StoreError>;

    /// Active member whose email matches, ignoring case.
    fn active_member_by_email(
        &self,
        organizer_id: Uuid,
        email: &str,
    ) -> Result<Option<TeamMember>, StoreError>;

    fn active_member_count(&self, organizer_id: Uuid) -> Result<u64, StoreError>;

    /// Every member ever admitted, including removed ones.
    fn list_members(&self, organizer_id: Uuid) -> Result<Vec<TeamMember>, StoreError>;

    /// Insert `member` if `claim` still holds and its organizer still has
    /// room under `limit`.
    ///
    /// Checking the claim, counting, inserting, and consuming an invitation
    /// claim must be one atomic step. Nothing changes unless the result is
    /// [`Admission::Admitted`].
    fn admit_member(
        &self,
        member: TeamMember,
        limit: TeamSizeLimit,
        claim: AdmissionClaim,
    ) -> Result<Admission, StoreError>;

    /// Overwrite an existing member.
    fn update_member(&self, member: &TeamMember) -> Result<(), StoreError>;

    fn invitation(&self, invitation_id: Uuid) -> Result<Option<TeamMemberInvitation>, StoreError>;

    /// Insert or overwrite an invitation.
    fn save_invitation(&self, invitation: &TeamMemberInvitation) -> Result<(), StoreError>;

    /// Move an invitation from pending to revoked if it is still pending at
    /// `now`.
    fn revoke_invitation(
        &self,
        invitation_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Revocation, StoreError>;

    /// Stored-pending invitations for `email` in `organizer_id`.
    fn pending_invitations_for(
        &self,
        organizer_id: Uuid,
        email: &str,
    ) -> Result<Vec<TeamMemberInvitation>, StoreError>;
}
