//! Principal entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resq_core::types::id::UserId;

use super::role::UserRole;

/// Document field names.
pub mod fields {
    /// Display name.
    pub const DISPLAY_NAME: &str = "display_name";
    /// Sign-in email.
    pub const EMAIL: &str = "email";
    /// Role.
    pub const ROLE: &str = "role";
}

/// A registered principal's profile, stored in `users` under the auth
/// provider's principal id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal id (auth provider uid).
    pub id: UserId,
    /// Human-readable name.
    pub display_name: String,
    /// Sign-in email address.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Role chosen at registration.
    pub role: UserRole,
    /// When the profile was created.
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Check if this principal has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name to show in notifications; falls back to the email address.
    pub fn name_or_email(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}

/// Profile fields written at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrincipal {
    /// Human-readable name.
    pub display_name: String,
    /// Sign-in email address.
    pub email: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Chosen role.
    pub role: UserRole,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
}
