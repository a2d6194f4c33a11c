//! RBAC enforcement: checks whether a role holds a required permission.

use resq_core::error::AppError;
use resq_entity::user::UserRole;

use super::policies::{RbacPolicies, RequestPermission};

/// Enforces role-based access control for request operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Fails with an authorization error unless `role` holds `permission`.
    pub fn require_permission(
        &self,
        role: UserRole,
        permission: RequestPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission}'"
            )))
        }
    }

    /// Checks whether the role has the required permission (returns bool).
    pub fn has_permission(&self, role: UserRole, permission: RequestPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resq_core::error::ErrorKind;

    #[test]
    fn test_denial_is_authorization_error() {
        let err = RbacEnforcer::new()
            .require_permission(UserRole::Citizen, RequestPermission::Claim)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(err.message.contains("claim"));
    }
}
