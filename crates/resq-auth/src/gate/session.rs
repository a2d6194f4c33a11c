//! What the gate knows about the current client session.

use resq_core::types::id::UserId;
use resq_entity::user::{Principal, UserRole};

/// Authentication state of one client.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No principal is signed in.
    SignedOut,
    /// Signed in; the profile (and so the role) is still loading.
    Resolving(UserId),
    /// Signed in with a loaded profile.
    Active(Principal),
}

impl SessionState {
    /// The signed-in principal id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::SignedOut => None,
            Self::Resolving(id) => Some(*id),
            Self::Active(principal) => Some(principal.id),
        }
    }

    /// The role, once the profile has resolved.
    pub fn role(&self) -> Option<UserRole> {
        match self {
            Self::Active(principal) => Some(principal.role),
            _ => None,
        }
    }

    /// The loaded profile, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Active(principal) => Some(principal),
            _ => None,
        }
    }

    /// Whether a principal is signed in, resolved or not.
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Self::SignedOut)
    }
}
