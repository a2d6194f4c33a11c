//! The application's route table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use resq_core::error::AppError;
use resq_entity::user::UserRole;

/// Every navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Landing page.
    Home,
    /// Sign-in form.
    Login,
    /// Registration form.
    Register,
    /// A citizen's own requests.
    CitizenDashboard,
    /// New request form.
    RequestHelp,
    /// Open pool and assignments.
    VolunteerDashboard,
    /// A volunteer's assigned tasks.
    VolunteerTasks,
    /// System-wide oversight.
    AdminDashboard,
}

impl Route {
    /// All routes in table order.
    pub const ALL: [Route; 8] = [
        Self::Home,
        Self::Login,
        Self::Register,
        Self::CitizenDashboard,
        Self::RequestHelp,
        Self::VolunteerDashboard,
        Self::VolunteerTasks,
        Self::AdminDashboard,
    ];

    /// URL path of the route.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::CitizenDashboard => "/citizen",
            Self::RequestHelp => "/citizen/request",
            Self::VolunteerDashboard => "/volunteer",
            Self::VolunteerTasks => "/volunteer/tasks",
            Self::AdminDashboard => "/admin",
        }
    }

    /// Roles that may open the route, or `None` if it is public.
    pub fn allowed_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            Self::Home | Self::Login | Self::Register => None,
            Self::CitizenDashboard | Self::RequestHelp => Some(&[UserRole::Citizen]),
            Self::VolunteerDashboard | Self::VolunteerTasks => Some(&[UserRole::Volunteer]),
            Self::AdminDashboard => Some(&[UserRole::Admin]),
        }
    }

    /// Whether any visitor may open the route.
    pub fn is_public(&self) -> bool {
        self.allowed_roles().is_none()
    }

    /// Resolve a path, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Landing route after sign-in for a role.
    pub fn home_for(role: UserRole) -> Route {
        match role {
            UserRole::Citizen => Self::CitizenDashboard,
            UserRole::Volunteer => Self::VolunteerDashboard,
            UserRole::Admin => Self::AdminDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| AppError::not_found(format!("No route for path '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_back() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(Route::from_path("/admin/"), Some(Route::AdminDashboard));
        assert_eq!(Route::from_path(""), Some(Route::Home));
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(Route::from_path("/admin/users"), None);
        assert!("/nowhere".parse::<Route>().is_err());
    }

    #[test]
    fn test_home_routes_admit_their_role() {
        for role in UserRole::ALL {
            let allowed = Route::home_for(role).allowed_roles().unwrap_or_default();
            assert!(allowed.contains(&role));
        }
    }
}
