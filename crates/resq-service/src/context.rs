//! Acting principal carried into every service call.

use serde::{Deserialize, Serialize};

use resq_core::types::id::UserId;
use resq_entity::user::{Principal, UserRole};

/// Who is performing an operation.
///
/// Built from the session's resolved profile so that every operation
/// knows the actor's id, role, and the name used in notification copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting principal.
    pub user_id: UserId,
    /// The principal's role.
    pub role: UserRole,
    /// Name shown to other users.
    pub display_name: String,
}

impl ActorContext {
    /// Creates a new actor context.
    pub fn new(user_id: UserId, role: UserRole, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            display_name: display_name.into(),
        }
    }

    /// Returns whether the actor is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Principal> for ActorContext {
    fn from(principal: &Principal) -> Self {
        Self::new(principal.id, principal.role, principal.name_or_email())
    }
}
