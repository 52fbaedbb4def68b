//! Reusable helpers for team access integration tests.
//!
//! [`TestTeam`] wires a [`TeamService`] to the in-memory stores with one
//! organizer and its bootstrapped owner.
#![allow(dead_code)]

use ev_access::config::Config;
use ev_access::permissions::Role;
use ev_access::team::{
    AcceptInvitationRequest, CreateInvitationRequest, InMemoryOrganizerDirectory,
    InMemoryTeamStore, MemberProfile, TeamMember, TeamMemberInvitation, TeamService,
};
use ev_common::{OrganizerSettings, SubscriptionTier};
use uuid::Uuid;

pub type Service = TeamService<InMemoryOrganizerDirectory, InMemoryTeamStore>;

/// A single organizer with its owner.
pub struct TestTeam {
    pub service: Service,
    pub organizer_id: Uuid,
    pub owner: TeamMember,
}

impl TestTeam {
    pub fn new(tier: SubscriptionTier) -> Self {
        Self::with_settings(OrganizerSettings::new("Acme Events", tier))
    }

    /// Organizer with an explicit seat ceiling.
    pub fn with_max_members(tier: SubscriptionTier, max: u32) -> Self {
        let mut settings = OrganizerSettings::new("Acme Events", tier);
        settings.max_team_members = Some(max);
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: OrganizerSettings) -> Self {
        let organizer_id = settings.id;
        let directory = InMemoryOrganizerDirectory::new();
        directory.insert(settings);

        let service = TeamService::from_config(
            directory,
            InMemoryTeamStore::new(),
            &Config::default_for_test(),
        );
        let owner = service
            .bootstrap_owner(
                organizer_id,
                Uuid::now_v7(),
                MemberProfile::new("Olivia Owner", "owner@acme.test"),
            )
            .unwrap();

        Self {
            service,
            organizer_id,
            owner,
        }
    }

    /// Add another organizer (and its owner) to the same service.
    pub fn add_organizer(&self, tier: SubscriptionTier) -> TeamMember {
        let settings = OrganizerSettings::new("Rival Events", tier);
        let organizer_id = settings.id;
        self.service.directory().insert(settings);
        self.service
            .bootstrap_owner(
                organizer_id,
                Uuid::now_v7(),
                MemberProfile::new("Rita Rival", "owner@rival.test"),
            )
            .unwrap()
    }

    pub fn invite(&self, inviter: &TeamMember, email: &str, role: Role) -> TeamMemberInvitation {
        self.service
            .invite_member(inviter.id, CreateInvitationRequest::new(email, role))
            .unwrap()
    }

    /// Invite and accept in one step.
    pub fn join(&self, inviter: &TeamMember, email: &str, role: Role) -> TeamMember {
        let invitation = self.invite(inviter, email, role);
        self.service
            .accept_invitation(invitation.id, accept_request(email))
            .unwrap()
    }

    pub fn active_count(&self) -> u64 {
        self.service.active_member_count(self.organizer_id).unwrap()
    }
}

pub fn accept_request(email: &str) -> AcceptInvitationRequest {
    AcceptInvitationRequest {
        user_id: Uuid::now_v7(),
        profile: MemberProfile::new("New Member", email),
    }
}
