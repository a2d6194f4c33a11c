//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Registration and sign-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum accepted password length at registration.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
    /// Upper bound on a single auth provider call, in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
}

impl AuthConfig {
    /// Upper bound on a single auth provider call.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min_length(),
            timeout_ms: default_timeout(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
        }
    }
}

fn default_password_min_length() -> usize {
    6
}

fn default_timeout() -> u64 {
    5_000
}

fn default_argon2_memory_kib() -> u32 {
    19_456
}

fn default_argon2_iterations() -> u32 {
    2
}
