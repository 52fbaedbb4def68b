//! In-memory stores backed by `DashMap`.
//!
//! Members live in per-organizer rosters. Admission holds the roster's shard
//! lock across claim check, count, and insert, so concurrent acceptances into
//! the same organizer serialize while different organizers proceed in
//! parallel. Lock order is roster, then invitation.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use ev_common::OrganizerSettings;
use uuid::Uuid;

use super::invitation::{normalize_email, InvitationStatus, TeamMemberInvitation};
use super::member::TeamMember;
use super::policy::TeamSizeLimit;
use super::store::{
    Admission, AdmissionClaim, OrganizerDirectory, Revocation, StoreError, TeamStore,
};
use crate::permissions::Role;

/// Organizer settings keyed by organizer ID.
#[derive(Debug, Default)]
pub struct InMemoryOrganizerDirectory {
    organizers: DashMap<Uuid, OrganizerSettings>,
}

impl InMemoryOrganizerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an organizer.
    pub fn insert(&self, settings: OrganizerSettings) {
        self.organizers.insert(settings.id, settings);
    }
}

impl OrganizerDirectory for InMemoryOrganizerDirectory {
    fn organizer_settings(
        &self,
        organizer_id: Uuid,
    ) -> Result<Option<OrganizerSettings>, StoreError> {
        Ok(self
            .organizers
            .get(&organizer_id)
            .map(|entry| entry.value().clone()))
    }
}

/// Thread-safe team store.
#[derive(Debug, Default)]
pub struct InMemoryTeamStore {
    /// Organizer ID -> every member ever admitted.
    rosters: DashMap<Uuid, Vec<TeamMember>>,
    /// Member ID -> organizer ID.
    member_index: DashMap<Uuid, Uuid>,
    invitations: DashMap<Uuid, TeamMemberInvitation>,
}

impl InMemoryTeamStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn find_in_roster<F>(&self, organizer_id: Uuid, pred: F) -> Option<TeamMember>
    where
        F: Fn(&TeamMember) -> bool,
    {
        self.rosters
            .get(&organizer_id)
            .and_then(|roster| roster.iter().find(|m| pred(m)).cloned())
    }
}

impl TeamStore for InMemoryTeamStore {
    fn member(&self, member_id: Uuid) -> Result<Option<TeamMember>, StoreError> {
        // Copy the organizer ID out so no index guard is held while the
        // roster is locked.
        let Some(organizer_id) = self.member_index.get(&member_id).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.find_in_roster(organizer_id, |m| m.id == member_id))
    }

    fn member_by_user(
        &self,
        organizer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMember>, StoreError> {
        Ok(self.find_in_roster(organizer_id, |m| m.is_active && m.user_id == user_id))
    }

    fn active_member_by_email(
        &self,
        organizer_id: Uuid,
        email: &str,
    ) -> Result<Option<TeamMember>, StoreError> {
        let email = normalize_email(email);
        Ok(self.find_in_roster(organizer_id, |m| {
            m.is_active && normalize_email(&m.profile.email) == email
        }))
    }

    fn active_member_count(&self, organizer_id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .rosters
            .get(&organizer_id)
            .map_or(0, |roster| roster.iter().filter(|m| m.is_active).count() as u64))
    }

    fn list_members(&self, organizer_id: Uuid) -> Result<Vec<TeamMember>, StoreError> {
        Ok(self
            .rosters
            .get(&organizer_id)
            .map(|roster| roster.value().clone())
            .unwrap_or_default())
    }

    fn admit_member(
        &self,
        member: TeamMember,
        limit: TeamSizeLimit,
        claim: AdmissionClaim,
    ) -> Result<Admission, StoreError> {
        let mut roster = self.rosters.entry(member.organizer_id).or_default();

        // The invitation guard stays alive until the member is inserted.
        let mut claimed = match claim {
            AdmissionClaim::Owner => {
                if roster.iter().any(|m| m.is_active && m.role == Role::Owner) {
                    return Ok(Admission::OwnerExists);
                }
                None
            }
            AdmissionClaim::Invitation { invitation_id, now } => {
                let invitation = self.invitations.get_mut(&invitation_id).ok_or_else(|| {
                    StoreError::Conflict(format!("invitation {invitation_id} does not exist"))
                })?;
                match invitation.status_at(now) {
                    InvitationStatus::Pending => Some((invitation, now)),
                    status => return Ok(Admission::InvitationNotPending(status)),
                }
            }
        };

        if roster
            .iter()
            .any(|m| m.is_active && m.user_id == member.user_id)
        {
            return Ok(Admission::AlreadyMember);
        }

        let active_members = roster.iter().filter(|m| m.is_active).count() as u64;
        if !limit.allows(active_members) {
            return Ok(Admission::LimitReached { active_members });
        }

        if let Some((invitation, now)) = claimed.as_mut() {
            invitation.mark_accepted(*now);
        }
        self.member_index.insert(member.id, member.organizer_id);
        roster.push(member);
        Ok(Admission::Admitted)
    }

    fn update_member(&self, member: &TeamMember) -> Result<(), StoreError> {
        let mut roster = self
            .rosters
            .get_mut(&member.organizer_id)
            .ok_or_else(|| StoreError::Conflict(format!("no roster for member {}", member.id)))?;

        let slot = roster
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or_else(|| StoreError::Conflict(format!("member {} was never admitted", member.id)))?;
        *slot = member.clone();
        Ok(())
    }

    fn invitation(&self, invitation_id: Uuid) -> Result<Option<TeamMemberInvitation>, StoreError> {
        Ok(self
            .invitations
            .get(&invitation_id)
            .map(|entry| entry.value().clone()))
    }

    fn save_invitation(&self, invitation: &TeamMemberInvitation) -> Result<(), StoreError> {
        self.invitations.insert(invitation.id, invitation.clone());
        Ok(())
    }

    fn revoke_invitation(
        &self,
        invitation_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Revocation, StoreError> {
        let mut invitation = self.invitations.get_mut(&invitation_id).ok_or_else(|| {
            StoreError::Conflict(format!("invitation {invitation_id} does not exist"))
        })?;

        match invitation.status_at(now) {
            InvitationStatus::Pending => {
                invitation.revoke(now);
                Ok(Revocation::Revoked(invitation.value().clone()))
            }
            status => Ok(Revocation::NotPending(status)),
        }
    }

    fn pending_invitations_for(
        &self,
        organizer_id: Uuid,
        email: &str,
    ) -> Result<Vec<TeamMemberInvitation>, StoreError> {
        let email = normalize_email(email);
        Ok(self
            .invitations
            .iter()
            .filter(|entry| {
                let inv = entry.value();
                inv.organizer_id == organizer_id
                    && inv.status == InvitationStatus::Pending
                    && inv.email == email
            })
            .map(|entry| entry.value().clone())
            .collect())
    }
}
