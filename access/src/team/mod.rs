//! Team Membership
//!
//! Members, invitations, admission policy, and the service that ties them to
//! a store.

pub mod invitation;
pub mod member;
pub mod memory;
pub mod policy;
pub mod service;
pub mod store;

pub use invitation::{
    normalize_email, AcceptInvitationRequest, CreateInvitationRequest, InvitationStatus,
    TeamMemberInvitation, INVITATION_TTL_DAYS,
};
pub use member::{ActivityKind, ActivityStats, MemberProfile, TeamMember, UpdateTeamMemberRequest};
pub use memory::{InMemoryOrganizerDirectory, InMemoryTeamStore};
pub use policy::{
    can_invite, check_team_size_limit, InvalidTeamSizeLimit, OrganizerTeamPolicy, TeamSizeLimit,
    TeamSizeTiers,
};
pub use service::TeamService;
pub use store::{Admission, AdmissionClaim, OrganizerDirectory, Revocation, StoreError, TeamStore};
