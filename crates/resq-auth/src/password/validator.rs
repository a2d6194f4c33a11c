//! Registration input policy.

use resq_core::config::AuthConfig;
use resq_core::error::AppError;

/// Validates registration credentials against configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the length policy.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }

    /// Validates that the confirmation matches the chosen password.
    pub fn validate_confirmation(&self, password: &str, confirm: &str) -> Result<(), AppError> {
        if password != confirm {
            return Err(AppError::validation("Passwords do not match"));
        }
        Ok(())
    }

    /// Minimal shape check for an email address.
    pub fn validate_email(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(AppError::validation("Please enter a valid email address"));
        }
        Ok(())
    }
}
