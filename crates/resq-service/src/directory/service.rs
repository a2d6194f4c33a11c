//! Profile lookup and creation.

use std::sync::Arc;

use tracing::info;

use resq_core::error::AppError;
use resq_core::types::id::UserId;
use resq_entity::user::{NewPrincipal, Principal, UserRole};
use resq_store::UserRepository;

/// Maps authenticated principals to their profiles and roles.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    /// User repository.
    users: Arc<UserRepository>,
}

impl DirectoryService {
    /// Creates a new directory service.
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }

    /// Stores the profile of a freshly registered principal.
    pub async fn create_profile(
        &self,
        id: UserId,
        profile: &NewPrincipal,
    ) -> Result<Principal, AppError> {
        let principal = self.users.insert(id, profile).await?;
        info!(
            user_id = %principal.id,
            role = %principal.role,
            "Profile created"
        );
        Ok(principal)
    }

    /// Finds a profile, if one exists.
    pub async fn find(&self, id: UserId) -> Result<Option<Principal>, AppError> {
        self.users.find_by_id(id).await
    }

    /// Loads a profile that must exist.
    pub async fn resolve(&self, id: UserId) -> Result<Principal, AppError> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No profile for principal {id}")))
    }

    /// Loads a profile and checks that it belongs to a volunteer.
    pub async fn require_volunteer(&self, id: UserId) -> Result<Principal, AppError> {
        let principal = self.resolve(id).await?;
        if principal.role != UserRole::Volunteer {
            return Err(AppError::validation(format!(
                "{} is not a registered volunteer",
                principal.name_or_email()
            )));
        }
        Ok(principal)
    }

    /// Lists every registered volunteer, by display name.
    pub async fn list_volunteers(&self) -> Result<Vec<Principal>, AppError> {
        self.users.find_by_role(UserRole::Volunteer).await
    }

    /// Finds a profile by sign-in email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, AppError> {
        self.users.find_by_email(email).await
    }
}
