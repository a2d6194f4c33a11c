//! Access decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::route::Route;
use super::session::SessionState;

/// Outcome of asking whether the current session may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// Render the route.
    Allow,
    /// Nobody is signed in.
    RedirectToLogin,
    /// Signed in with a role the route does not admit.
    RedirectToHome,
    /// The profile is still loading; show a neutral waiting state.
    Pending,
    /// No such route.
    NotFound,
}

impl AccessDecision {
    /// Whether the route may be rendered.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Route to navigate to instead, if the decision redirects.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::RedirectToLogin => Some(Route::Login),
            Self::RedirectToHome => Some(Route::Home),
            _ => None,
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Allow => "allow",
            Self::RedirectToLogin => "redirect_to_login",
            Self::RedirectToHome => "redirect_to_home",
            Self::Pending => "pending",
            Self::NotFound => "not_found",
        };
        f.write_str(label)
    }
}

/// Decide whether `session` may open `route`.
pub fn can_access(route: Route, session: &SessionState) -> AccessDecision {
    let Some(allowed) = route.allowed_roles() else {
        return AccessDecision::Allow;
    };
    match session {
        SessionState::SignedOut => AccessDecision::RedirectToLogin,
        SessionState::Resolving(_) => AccessDecision::Pending,
        SessionState::Active(principal) if allowed.contains(&principal.role) => {
            AccessDecision::Allow
        }
        SessionState::Active(_) => AccessDecision::RedirectToHome,
    }
}

/// Decide for a raw path. Unknown paths are [`AccessDecision::NotFound`].
pub fn can_access_path(path: &str, session: &SessionState) -> AccessDecision {
    match Route::from_path(path) {
        Some(route) => can_access(route, session),
        None => AccessDecision::NotFound,
    }
}

/// `true` only when the decision is [`AccessDecision::Allow`].
pub fn is_allowed(route: Route, session: &SessionState) -> bool {
    can_access(route, session).is_allowed()
}
