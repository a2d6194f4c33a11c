//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use resq_entity::request::RequestAction;
use resq_entity::user::UserRole;

/// Something a principal may do with help requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPermission {
    /// Submit a new request.
    Create,
    /// See requests one authored.
    ViewOwn,
    /// See the pool of unclaimed requests.
    ViewOpen,
    /// See requests one is assigned to.
    ViewAssigned,
    /// See every request.
    ViewAll,
    /// Take an unclaimed request.
    Claim,
    /// Mark an assigned request completed.
    Complete,
    /// Force-assign a request to a volunteer.
    Reassign,
    /// Toggle the urgent flag.
    SetUrgent,
    /// Remove an unclaimed request.
    Delete,
}

impl RequestPermission {
    /// The permission a lifecycle action requires.
    pub fn for_action(action: RequestAction) -> Self {
        match action {
            RequestAction::Claim => Self::Claim,
            RequestAction::Reassign => Self::Reassign,
            RequestAction::Complete => Self::Complete,
            RequestAction::SetUrgent => Self::SetUrgent,
            RequestAction::Delete => Self::Delete,
        }
    }

    /// Return the permission as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ViewOwn => "view_own",
            Self::ViewOpen => "view_open",
            Self::ViewAssigned => "view_assigned",
            Self::ViewAll => "view_all",
            Self::Claim => "claim",
            Self::Complete => "complete",
            Self::Reassign => "reassign",
            Self::SetUrgent => "set_urgent",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for RequestPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of permissions.
    policies: HashMap<UserRole, HashSet<RequestPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // Citizen: author and track own requests
        let citizen: HashSet<_> = [RequestPermission::Create, RequestPermission::ViewOwn]
            .into_iter()
            .collect();
        policies.insert(UserRole::Citizen, citizen);

        // Volunteer: claim from the pool, complete own assignments
        let volunteer: HashSet<_> = [
            RequestPermission::ViewOpen,
            RequestPermission::ViewAssigned,
            RequestPermission::Claim,
            RequestPermission::Complete,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Volunteer, volunteer);

        // Admin: oversight, never authors or claims
        let admin: HashSet<_> = [
            RequestPermission::ViewAll,
            RequestPermission::ViewOpen,
            RequestPermission::Complete,
            RequestPermission::Reassign,
            RequestPermission::SetUrgent,
            RequestPermission::Delete,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Admin, admin);

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: UserRole) -> HashSet<RequestPermission> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: UserRole, permission: RequestPermission) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
