//! Notification dispatch configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for best-effort notification delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Whether lifecycle transitions emit notifications at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound on creating one notification, in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl NotificationsConfig {
    /// The dispatch timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    2_000
}
