//! Access Error Types

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::permissions::{InvalidRegionCode, PermissionError};
use crate::team::{InvitationStatus, StoreError};

/// Coarse error category, for callers mapping errors onto their transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced member, invitation, or organizer does not exist.
    NotFound,
    /// The caller may not act in this organizer at all.
    Unauthorized,
    /// The caller's permissions or regional access do not cover the action.
    PermissionDenied,
    /// The request is invalid or breaks a team policy.
    Validation,
    /// The invitation's acceptance window has passed.
    Expired,
    /// The invitation already reached a terminal state.
    Conflict,
    /// A collaborator failed.
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Team member not found: {0}")]
    MemberNotFound(Uuid),

    #[error("Invitation not found: {0}")]
    InvitationNotFound(Uuid),

    #[error("Organizer not found: {0}")]
    OrganizerNotFound(Uuid),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(#[from] PermissionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invitation expired at {expires_at}")]
    InvitationExpired { expires_at: DateTime<Utc> },

    #[error("Invitation is already {0}")]
    InvitationNotPending(InvitationStatus),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl AccessError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MemberNotFound(_) | Self::InvitationNotFound(_) | Self::OrganizerNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvitationExpired { .. } => ErrorKind::Expired,
            Self::InvitationNotPending(_) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl From<validator::ValidationErrors> for AccessError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<InvalidRegionCode> for AccessError {
    fn from(err: InvalidRegionCode) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type AccessResult<T> = Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permission;

    #[test]
    fn test_kinds() {
        assert_eq!(
            AccessError::MemberNotFound(Uuid::nil()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AccessError::unauthorized("scope").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            AccessError::from(PermissionError::MissingPermission(Permission::ManageRoles)).kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(AccessError::validation("bad").kind(), ErrorKind::Validation);
        assert_eq!(
            AccessError::InvitationExpired {
                expires_at: Utc::now()
            }
            .kind(),
            ErrorKind::Expired
        );
        assert_eq!(
            AccessError::InvitationNotPending(InvitationStatus::Revoked).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_limit_message() {
        let err = AccessError::validation("Team member limit reached");
        assert_eq!(err.to_string(), "Validation error: Team member limit reached");
    }

    #[test]
    fn test_invalid_region_is_validation() {
        let err: AccessError = InvalidRegionCode("XYZ".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
