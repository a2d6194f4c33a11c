//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role a principal chose at registration. Roles never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Requests help.
    Citizen,
    /// Claims and fulfils requests.
    Volunteer,
    /// Oversees every request.
    Admin,
}

impl UserRole {
    /// All roles, in registration-form order.
    pub const ALL: [UserRole; 3] = [Self::Citizen, Self::Volunteer, Self::Admin];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Volunteer => "volunteer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = resq_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "citizen" => Ok(Self::Citizen),
            "volunteer" => Ok(Self::Volunteer),
            "admin" => Ok(Self::Admin),
            _ => Err(resq_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: citizen, volunteer, admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("Volunteer".parse::<UserRole>().unwrap(), UserRole::Volunteer);
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&UserRole::Citizen).unwrap();
        assert_eq!(json, "\"citizen\"");
    }
}
