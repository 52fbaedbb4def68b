//! Team Service
//!
//! Invitations, admissions, and member management for one deployment.
//! Every operation loads the acting member, checks organizer scope, the
//! composite permission/region decision, and the role hierarchy before it
//! writes anything.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::invitation::{
    AcceptInvitationRequest, CreateInvitationRequest, InvitationStatus, TeamMemberInvitation,
};
use super::member::{ActivityKind, MemberProfile, TeamMember, UpdateTeamMemberRequest};
use super::policy::{team_limit_reached, OrganizerTeamPolicy, TeamSizeLimit, TeamSizeTiers};
use super::store::{Admission, AdmissionClaim, OrganizerDirectory, Revocation, TeamStore};
use crate::config::Config;
use crate::error::{AccessError, AccessResult};
use crate::permissions::{
    authorize, can_assign_role, can_manage_member, check_escalation, require_same_organizer,
    AccessToggles, Permission, PermissionError, RegionCode, Role,
};

/// Team management over injected collaborators.
#[derive(Debug)]
pub struct TeamService<D, S> {
    directory: D,
    store: S,
    tiers: TeamSizeTiers,
}

impl<D: OrganizerDirectory, S: TeamStore> TeamService<D, S> {
    #[must_use]
    pub const fn new(directory: D, store: S, tiers: TeamSizeTiers) -> Self {
        Self {
            directory,
            store,
            tiers,
        }
    }

    /// Service using the tier limits from `config`.
    #[must_use]
    pub const fn from_config(directory: D, store: S, config: &Config) -> Self {
        Self::new(directory, store, config.team_limits)
    }

    pub const fn directory(&self) -> &D {
        &self.directory
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Effective admission policy for an organizer.
    pub fn team_policy(&self, organizer_id: Uuid) -> AccessResult<OrganizerTeamPolicy> {
        let settings = self
            .directory
            .organizer_settings(organizer_id)
            .inspect_err(|e| error!(%organizer_id, error = %e, "Organizer lookup failed"))?
            .ok_or(AccessError::OrganizerNotFound(organizer_id))?;
        Ok(OrganizerTeamPolicy::from_settings(&settings, &self.tiers))
    }

    pub fn member(&self, member_id: Uuid) -> AccessResult<TeamMember> {
        self.store
            .member(member_id)
            .inspect_err(|e| error!(%member_id, error = %e, "Member lookup failed"))?
            .ok_or(AccessError::MemberNotFound(member_id))
    }

    pub fn invitation(&self, invitation_id: Uuid) -> AccessResult<TeamMemberInvitation> {
        self.store
            .invitation(invitation_id)
            .inspect_err(|e| error!(%invitation_id, error = %e, "Invitation lookup failed"))?
            .ok_or(AccessError::InvitationNotFound(invitation_id))
    }

    pub fn active_member_count(&self, organizer_id: Uuid) -> AccessResult<u64> {
        Ok(self.store.active_member_count(organizer_id)?)
    }

    /// Active members of an organizer.
    pub fn active_members(&self, organizer_id: Uuid) -> AccessResult<Vec<TeamMember>> {
        let mut members = self.store.list_members(organizer_id)?;
        members.retain(|m| m.is_active);
        Ok(members)
    }

    /// Effective status of an invitation at `now`.
    pub fn invitation_status(
        &self,
        invitation_id: Uuid,
        now: DateTime<Utc>,
    ) -> AccessResult<InvitationStatus> {
        Ok(self.invitation(invitation_id)?.status_at(now))
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Load a member and run the composite permission and region check.
    #[tracing::instrument(skip(self))]
    pub fn authorize_member(
        &self,
        member_id: Uuid,
        permission: Permission,
        region: &RegionCode,
    ) -> AccessResult<()> {
        let member = self.member(member_id)?;
        authorize(&member, permission, region)
            .inspect_err(|e| warn!(%member_id, reason = %e, "Access denied"))?;
        Ok(())
    }

    /// Load actor and target and check that `actor_id` may manage the target
    /// with `permission`.
    ///
    /// Checked against the actor's `*` toggles. The target's own profile
    /// never picks the region.
    fn load_managed(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        permission: Permission,
    ) -> AccessResult<(TeamMember, TeamMember)> {
        let actor = self.member(actor_id)?;
        let target = self.member(member_id)?;

        require_same_organizer(&actor, target.organizer_id)
            .inspect_err(|_| warn!(%actor_id, %member_id, "Cross-organizer access rejected"))?;
        authorize(&actor, permission, &RegionCode::wildcard())
            .and_then(|()| can_manage_member(&actor, &target))
            .inspect_err(|e| warn!(%actor_id, %member_id, reason = %e, "Team action denied"))?;

        Ok((actor, target))
    }

    fn require_active(member: &TeamMember) -> AccessResult<()> {
        if member.is_active {
            Ok(())
        } else {
            Err(AccessError::validation("Team member has been removed"))
        }
    }

    fn save_member(&self, member: &TeamMember) -> AccessResult<()> {
        self.store
            .update_member(member)
            .inspect_err(|e| error!(member_id = %member.id, error = %e, "Member update failed"))?;
        Ok(())
    }

    // ========================================================================
    // Owner bootstrap
    // ========================================================================

    /// Create the Owner membership for a new organizer.
    #[tracing::instrument(skip(self, profile))]
    pub fn bootstrap_owner(
        &self,
        organizer_id: Uuid,
        user_id: Uuid,
        profile: MemberProfile,
    ) -> AccessResult<TeamMember> {
        profile.validate()?;
        self.team_policy(organizer_id)?;

        let owner = TeamMember::owner(organizer_id, user_id, profile, Utc::now());
        match self
            .store
            .admit_member(owner.clone(), TeamSizeLimit::Unbounded, AdmissionClaim::Owner)?
        {
            Admission::Admitted => {
                info!(%organizer_id, member_id = %owner.id, "Organizer owner created");
                Ok(owner)
            }
            Admission::OwnerExists => {
                Err(AccessError::validation("Organizer already has an owner"))
            }
            Admission::AlreadyMember => Err(AccessError::validation(
                "User is already a member of this organizer",
            )),
            Admission::LimitReached { .. } => Err(team_limit_reached()),
            Admission::InvitationNotPending(status) => {
                Err(AccessError::InvitationNotPending(status))
            }
        }
    }

    // ========================================================================
    // Invitations
    // ========================================================================

    pub fn invite_member(
        &self,
        actor_id: Uuid,
        request: CreateInvitationRequest,
    ) -> AccessResult<TeamMemberInvitation> {
        self.invite_member_at(actor_id, request, Utc::now())
    }

    /// Create a pending invitation into the actor's organizer.
    ///
    /// The caller is responsible for notifying the invitee.
    #[tracing::instrument(skip(self, request), fields(role = %request.role))]
    pub fn invite_member_at(
        &self,
        actor_id: Uuid,
        request: CreateInvitationRequest,
        now: DateTime<Utc>,
    ) -> AccessResult<TeamMemberInvitation> {
        request.validate()?;
        if request.role == Role::Owner {
            return Err(AccessError::validation("Cannot invite a member as owner"));
        }

        let actor = self.member(actor_id)?;
        let organizer_id = actor.organizer_id;

        authorize(&actor, Permission::InviteTeamMembers, &RegionCode::wildcard())
            .and_then(|()| can_assign_role(actor.role, request.role))
            .and_then(|()| match request.permissions {
                Some(requested) => check_escalation(actor.permissions, requested),
                None => Ok(()),
            })
            .inspect_err(|e| warn!(%actor_id, reason = %e, "Invitation denied"))?;

        let policy = self.team_policy(organizer_id)?;
        policy.ensure_can_invite()?;
        let active = self.store.active_member_count(organizer_id)?;
        policy.ensure_within_team_size(active).inspect_err(|_| {
            warn!(%organizer_id, active, limit = %policy.max_team_members, "Team member limit reached");
        })?;

        if self
            .store
            .active_member_by_email(organizer_id, &request.email)?
            .is_some()
        {
            return Err(AccessError::validation(
                "This email already belongs to a team member",
            ));
        }
        let already_pending = self
            .store
            .pending_invitations_for(organizer_id, &request.email)?
            .iter()
            .any(|inv| inv.status_at(now) == InvitationStatus::Pending);
        if already_pending {
            return Err(AccessError::validation(
                "An invitation is already pending for this email",
            ));
        }

        let invitation = TeamMemberInvitation::new(organizer_id, actor.id, request, now);
        self.store.save_invitation(&invitation)?;

        info!(
            %organizer_id,
            invitation_id = %invitation.id,
            role = %invitation.role,
            expires_at = %invitation.expires_at,
            "Team invitation created"
        );
        Ok(invitation)
    }

    pub fn accept_invitation(
        &self,
        invitation_id: Uuid,
        request: AcceptInvitationRequest,
    ) -> AccessResult<TeamMember> {
        self.accept_invitation_at(invitation_id, request, Utc::now())
    }

    /// Accept an invitation and admit the new member.
    ///
    /// Collaboration and team size are checked again here. The store then
    /// re-checks the invitation status and the size limit, consumes the
    /// invitation, and inserts the member in one atomic step.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub fn accept_invitation_at(
        &self,
        invitation_id: Uuid,
        request: AcceptInvitationRequest,
        now: DateTime<Utc>,
    ) -> AccessResult<TeamMember> {
        request.validate()?;
        let invitation = self.invitation(invitation_id)?;

        match invitation.status_at(now) {
            InvitationStatus::Pending => {}
            InvitationStatus::Expired => {
                warn!(%invitation_id, expires_at = %invitation.expires_at, "Invitation expired");
                return Err(AccessError::InvitationExpired {
                    expires_at: invitation.expires_at,
                });
            }
            status => return Err(AccessError::InvitationNotPending(status)),
        }

        if !invitation.is_for_email(&request.profile.email) {
            warn!(%invitation_id, "Invitation accepted with a different email");
            return Err(AccessError::unauthorized(
                "Invitation was issued to a different email",
            ));
        }

        let organizer_id = invitation.organizer_id;
        let policy = self.team_policy(organizer_id)?;
        policy.ensure_can_invite()?;
        policy.ensure_within_team_size(self.store.active_member_count(organizer_id)?)?;

        let member = TeamMember::from_invitation(&invitation, request.user_id, request.profile, now);
        let claim = AdmissionClaim::Invitation { invitation_id, now };
        match self
            .store
            .admit_member(member.clone(), policy.max_team_members, claim)
            .inspect_err(|e| error!(%organizer_id, error = %e, "Member admission failed"))?
        {
            Admission::Admitted => {}
            Admission::LimitReached { active_members } => {
                warn!(
                    %organizer_id,
                    active_members,
                    limit = %policy.max_team_members,
                    "Team member limit reached at commit"
                );
                return Err(team_limit_reached());
            }
            Admission::AlreadyMember => {
                return Err(AccessError::validation(
                    "User is already a member of this organizer",
                ));
            }
            Admission::InvitationNotPending(InvitationStatus::Expired) => {
                warn!(%invitation_id, expires_at = %invitation.expires_at, "Invitation expired at commit");
                return Err(AccessError::InvitationExpired {
                    expires_at: invitation.expires_at,
                });
            }
            Admission::InvitationNotPending(status) => {
                warn!(%invitation_id, %status, "Invitation no longer pending at commit");
                return Err(AccessError::InvitationNotPending(status));
            }
            Admission::OwnerExists => {
                return Err(AccessError::validation("Organizer already has an owner"));
            }
        }

        info!(
            %organizer_id,
            member_id = %member.id,
            role = %member.role,
            "Invitation accepted"
        );
        Ok(member)
    }

    /// Revoke a pending invitation.
    #[tracing::instrument(skip(self))]
    pub fn revoke_invitation(
        &self,
        actor_id: Uuid,
        invitation_id: Uuid,
    ) -> AccessResult<TeamMemberInvitation> {
        let now = Utc::now();
        let actor = self.member(actor_id)?;
        let invitation = self.invitation(invitation_id)?;

        require_same_organizer(&actor, invitation.organizer_id)?;
        authorize(&actor, Permission::InviteTeamMembers, &RegionCode::wildcard())
            .and_then(|()| can_assign_role(actor.role, invitation.role))
            .inspect_err(|e| warn!(%actor_id, reason = %e, "Invitation revoke denied"))?;

        let invitation = match self.store.revoke_invitation(invitation_id, now)? {
            Revocation::Revoked(invitation) => invitation,
            Revocation::NotPending(status) => {
                return Err(AccessError::InvitationNotPending(status))
            }
        };

        info!(%invitation_id, "Invitation revoked");
        Ok(invitation)
    }

    // ========================================================================
    // Member management
    // ========================================================================

    /// Assign a new role. Permissions and regional access reset to the new
    /// role's defaults.
    #[tracing::instrument(skip(self))]
    pub fn change_role(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        role: Role,
    ) -> AccessResult<TeamMember> {
        let (actor, mut target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;
        Self::require_active(&target)?;
        can_assign_role(actor.role, role)
            .inspect_err(|e| warn!(%actor_id, %member_id, reason = %e, "Role change denied"))?;

        let previous = target.role;
        target.change_role(role);
        self.save_member(&target)?;

        info!(%member_id, from = %previous, to = %role, "Team member role changed");
        Ok(target)
    }

    /// Add one permission to a member. The actor must hold it.
    #[tracing::instrument(skip(self))]
    pub fn grant_permission(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        permission: Permission,
    ) -> AccessResult<TeamMember> {
        let (actor, mut target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;
        Self::require_active(&target)?;
        check_escalation(actor.permissions, permission.flag())
            .inspect_err(|e| warn!(%actor_id, %member_id, reason = %e, "Grant denied"))?;

        target.permissions.grant(permission);
        self.save_member(&target)?;

        info!(%member_id, %permission, "Permission granted");
        Ok(target)
    }

    /// Remove one permission from a member.
    #[tracing::instrument(skip(self))]
    pub fn revoke_permission(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        permission: Permission,
    ) -> AccessResult<TeamMember> {
        let (_, mut target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;
        Self::require_active(&target)?;

        target.permissions.revoke(permission);
        self.save_member(&target)?;

        info!(%member_id, %permission, "Permission revoked");
        Ok(target)
    }

    /// Set the toggles for one region of a member's grid.
    #[tracing::instrument(skip(self))]
    pub fn set_regional_access(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        region: RegionCode,
        toggles: AccessToggles,
    ) -> AccessResult<TeamMember> {
        let (_, mut target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;
        Self::require_active(&target)?;

        target.regional_access.set(region.clone(), toggles);
        self.save_member(&target)?;

        info!(%member_id, %region, areas = toggles.enabled_count(), "Regional access updated");
        Ok(target)
    }

    /// Drop a region from a member's grid. Lookups for it fall back to `*`.
    #[tracing::instrument(skip(self))]
    pub fn clear_regional_access(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        region: RegionCode,
    ) -> AccessResult<TeamMember> {
        let (_, mut target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;
        Self::require_active(&target)?;

        if target.regional_access.remove(&region).is_some() {
            self.save_member(&target)?;
            info!(%member_id, %region, "Regional access cleared");
        }
        Ok(target)
    }

    /// Edit profile fields. Members may edit themselves; anyone else needs
    /// `ManageRoles` over the target.
    #[tracing::instrument(skip(self, update))]
    pub fn update_profile(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        update: UpdateTeamMemberRequest,
    ) -> AccessResult<TeamMember> {
        update.validate()?;

        let mut target = if actor_id == member_id {
            let member = self.member(member_id)?;
            if !member.is_active {
                return Err(PermissionError::InactiveMember.into());
            }
            member
        } else {
            let (_, target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;
            Self::require_active(&target)?;
            target
        };

        if update.is_empty() {
            return Ok(target);
        }

        target.apply_update(update);
        self.save_member(&target)?;

        info!(%member_id, "Team member profile updated");
        Ok(target)
    }

    pub fn remove_member(&self, actor_id: Uuid, member_id: Uuid) -> AccessResult<TeamMember> {
        self.remove_member_at(actor_id, member_id, Utc::now())
    }

    /// Logically remove a member. Removing an already removed member is a
    /// no-op.
    #[tracing::instrument(skip(self))]
    pub fn remove_member_at(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        now: DateTime<Utc>,
    ) -> AccessResult<TeamMember> {
        let (actor, mut target) = self.load_managed(actor_id, member_id, Permission::ManageRoles)?;

        if !target.deactivate(actor.id, now) {
            info!(%member_id, "Team member already removed");
            return Ok(target);
        }
        self.save_member(&target)?;

        info!(%member_id, removed_by = %actor.id, "Team member removed");
        Ok(target)
    }

    /// Count a login or action against an active member.
    pub fn record_activity(
        &self,
        member_id: Uuid,
        kind: ActivityKind,
        now: DateTime<Utc>,
    ) -> AccessResult<TeamMember> {
        let mut member = self.member(member_id)?;
        if !member.is_active {
            return Err(PermissionError::InactiveMember.into());
        }
        member.record_activity(kind, now);
        self.save_member(&member)?;
        Ok(member)
    }
}
