//! Team admission policy.
//!
//! Whether an organizer may grow its team at all, and how large it may get.

use std::fmt;
use std::str::FromStr;

use ev_common::{OrganizerSettings, SubscriptionTier};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AccessError, AccessResult};

/// Ceiling on active team members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSizeLimit {
    /// At most this many active members. Never zero.
    Limited(u32),
    Unbounded,
}

impl TeamSizeLimit {
    /// Limit of `max` members. Zero is rejected.
    #[must_use]
    pub const fn limited(max: u32) -> Option<Self> {
        if max == 0 {
            None
        } else {
            Some(Self::Limited(max))
        }
    }

    /// Whether one more member fits next to `active_count` existing ones.
    #[must_use]
    pub fn allows(&self, active_count: u64) -> bool {
        match self {
            Self::Limited(max) => active_count < u64::from(*max),
            Self::Unbounded => true,
        }
    }
}

impl fmt::Display for TeamSizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(max) => write!(f, "{max}"),
            Self::Unbounded => f.write_str("unlimited"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid team size limit '{0}': expected a positive integer or 'unlimited'")]
pub struct InvalidTeamSizeLimit(pub String);

impl FromStr for TeamSizeLimit {
    type Err = InvalidTeamSizeLimit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unbounded);
        }
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(Self::limited)
            .ok_or_else(|| InvalidTeamSizeLimit(s.to_string()))
    }
}

/// Default team size per subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSizeTiers {
    pub free: TeamSizeLimit,
    pub starter: TeamSizeLimit,
    pub professional: TeamSizeLimit,
    pub enterprise: TeamSizeLimit,
}

impl Default for TeamSizeTiers {
    fn default() -> Self {
        Self {
            free: TeamSizeLimit::Limited(1),
            starter: TeamSizeLimit::Limited(5),
            professional: TeamSizeLimit::Limited(25),
            enterprise: TeamSizeLimit::Unbounded,
        }
    }
}

impl TeamSizeTiers {
    #[must_use]
    pub const fn for_tier(&self, tier: SubscriptionTier) -> TeamSizeLimit {
        match tier {
            SubscriptionTier::Free => self.free,
            SubscriptionTier::Starter => self.starter,
            SubscriptionTier::Professional => self.professional,
            SubscriptionTier::Enterprise => self.enterprise,
        }
    }
}

/// Effective admission policy for one organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerTeamPolicy {
    pub organizer_id: Uuid,
    pub allow_team_collaboration: bool,
    pub max_team_members: TeamSizeLimit,
}

impl OrganizerTeamPolicy {
    /// Resolve the policy. An explicit override beats the tier default; a
    /// zero override is ignored.
    #[must_use]
    pub fn from_settings(settings: &OrganizerSettings, tiers: &TeamSizeTiers) -> Self {
        let max_team_members = settings
            .max_team_members
            .and_then(TeamSizeLimit::limited)
            .unwrap_or_else(|| tiers.for_tier(settings.subscription_tier));

        Self {
            organizer_id: settings.id,
            allow_team_collaboration: settings.allow_team_collaboration,
            max_team_members,
        }
    }

    /// Raise [`can_invite`] as an error.
    pub fn ensure_can_invite(&self) -> AccessResult<()> {
        if can_invite(self) {
            Ok(())
        } else {
            Err(AccessError::unauthorized(
                "Team collaboration is disabled for this organizer",
            ))
        }
    }

    /// Raise [`check_team_size_limit`] as an error.
    pub fn ensure_within_team_size(&self, active_count: u64) -> AccessResult<()> {
        if check_team_size_limit(active_count, self.max_team_members) {
            Ok(())
        } else {
            Err(team_limit_reached())
        }
    }
}

/// Whether the organizer accepts new team members at all.
#[must_use]
pub const fn can_invite(policy: &OrganizerTeamPolicy) -> bool {
    policy.allow_team_collaboration
}

/// Whether one more member fits. Only active members count.
#[must_use]
pub fn check_team_size_limit(active_count: u64, max: TeamSizeLimit) -> bool {
    max.allows(active_count)
}

pub(crate) fn team_limit_reached() -> AccessError {
    AccessError::validation("Team member limit reached")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn settings(tier: SubscriptionTier) -> OrganizerSettings {
        OrganizerSettings::new("Acme Events", tier)
    }

    #[test]
    fn test_check_team_size_limit() {
        assert!(!check_team_size_limit(5, TeamSizeLimit::Limited(5)));
        assert!(check_team_size_limit(4, TeamSizeLimit::Limited(5)));
        assert!(check_team_size_limit(0, TeamSizeLimit::Limited(1)));
        assert!(!check_team_size_limit(6, TeamSizeLimit::Limited(5)));
        assert!(check_team_size_limit(100, TeamSizeLimit::Unbounded));
    }

    #[test]
    fn test_limited_rejects_zero() {
        assert_eq!(TeamSizeLimit::limited(0), None);
        assert_eq!(TeamSizeLimit::limited(3), Some(TeamSizeLimit::Limited(3)));
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!("25".parse::<TeamSizeLimit>().unwrap(), TeamSizeLimit::Limited(25));
        assert_eq!(
            "Unlimited".parse::<TeamSizeLimit>().unwrap(),
            TeamSizeLimit::Unbounded
        );
        assert!("0".parse::<TeamSizeLimit>().is_err());
        assert!("-1".parse::<TeamSizeLimit>().is_err());
        assert!("lots".parse::<TeamSizeLimit>().is_err());
    }

    #[test]
    fn test_tier_defaults() {
        let tiers = TeamSizeTiers::default();
        assert_eq!(tiers.for_tier(SubscriptionTier::Free), TeamSizeLimit::Limited(1));
        assert_eq!(tiers.for_tier(SubscriptionTier::Starter), TeamSizeLimit::Limited(5));
        assert_eq!(
            tiers.for_tier(SubscriptionTier::Professional),
            TeamSizeLimit::Limited(25)
        );
        assert_eq!(
            tiers.for_tier(SubscriptionTier::Enterprise),
            TeamSizeLimit::Unbounded
        );
    }

    #[test]
    fn test_override_beats_tier() {
        let mut org = settings(SubscriptionTier::Starter);
        org.max_team_members = Some(12);

        let policy = OrganizerTeamPolicy::from_settings(&org, &TeamSizeTiers::default());
        assert_eq!(policy.max_team_members, TeamSizeLimit::Limited(12));
        assert_eq!(policy.organizer_id, org.id);
    }

    #[test]
    fn test_zero_override_falls_back_to_tier() {
        let mut org = settings(SubscriptionTier::Professional);
        org.max_team_members = Some(0);

        let policy = OrganizerTeamPolicy::from_settings(&org, &TeamSizeTiers::default());
        assert_eq!(policy.max_team_members, TeamSizeLimit::Limited(25));
    }

    #[test]
    fn test_collaboration_disabled_is_unauthorized() {
        let mut org = settings(SubscriptionTier::Starter);
        org.allow_team_collaboration = false;

        let policy = OrganizerTeamPolicy::from_settings(&org, &TeamSizeTiers::default());
        assert!(!can_invite(&policy));
        assert_eq!(
            policy.ensure_can_invite().unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_limit_reached_is_validation() {
        let org = settings(SubscriptionTier::Starter);
        let policy = OrganizerTeamPolicy::from_settings(&org, &TeamSizeTiers::default());
        assert!(policy.ensure_within_team_size(4).is_ok());

        let err = policy.ensure_within_team_size(5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Validation error: Team member limit reached");
    }
}
