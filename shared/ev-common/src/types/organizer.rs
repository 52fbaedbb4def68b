//! Organizer Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier of an organizer account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Single-seat free plan.
    #[default]
    Free,
    /// Small team plan.
    Starter,
    /// Growing team plan.
    Professional,
    /// Contracted plan, usually without a seat ceiling.
    Enterprise,
}

impl SubscriptionTier {
    /// Returns all tiers, cheapest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Free, Self::Starter, Self::Professional, Self::Enterprise]
    }

    /// Returns the lowercase wire name of the tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }
}

/// Organizer settings as published by the organizer directory.
///
/// The team access library only reads these; it never writes them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerSettings {
    /// Organizer ID.
    pub id: Uuid,
    /// Organizer display name.
    pub name: String,
    /// Current subscription tier.
    pub subscription_tier: SubscriptionTier,
    /// Whether the organizer may have team members beyond the owner.
    pub allow_team_collaboration: bool,
    /// Explicit seat ceiling negotiated for this organizer.
    ///
    /// Overrides the tier default when set.
    pub max_team_members: Option<u32>,
    /// When the organizer was created.
    pub created_at: DateTime<Utc>,
}

impl OrganizerSettings {
    /// Create settings for a new organizer on the given tier.
    ///
    /// Collaboration is enabled for every paid tier.
    #[must_use]
    pub fn new(name: impl Into<String>, subscription_tier: SubscriptionTier) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            subscription_tier,
            allow_team_collaboration: subscription_tier != SubscriptionTier::Free,
            max_team_members: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_wire_names() {
        for tier in SubscriptionTier::all() {
            let json = serde_json::to_string(tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
        }
    }

    #[test]
    fn test_default_tier_is_free() {
        assert_eq!(SubscriptionTier::default(), SubscriptionTier::Free);
    }

    #[test]
    fn test_new_enables_collaboration_on_paid_tiers() {
        assert!(!OrganizerSettings::new("Solo", SubscriptionTier::Free).allow_team_collaboration);
        assert!(OrganizerSettings::new("Crew", SubscriptionTier::Starter).allow_team_collaboration);
        assert!(
            OrganizerSettings::new("Agency", SubscriptionTier::Enterprise)
                .allow_team_collaboration
        );
    }

    #[test]
    fn test_settings_roundtrip_keeps_override() {
        let mut settings = OrganizerSettings::new("Festival Co", SubscriptionTier::Professional);
        settings.max_team_members = Some(12);

        let json = serde_json::to_string(&settings).unwrap();
        let restored: OrganizerSettings = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id, settings.id);
        assert_eq!(restored.max_team_members, Some(12));
        assert_eq!(restored.subscription_tier, SubscriptionTier::Professional);
    }
}
