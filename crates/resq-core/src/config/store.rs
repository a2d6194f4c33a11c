//! Document store adapter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for calls made against the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upper bound on a single store call, in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
    /// Buffered snapshots per live subscription before the oldest are dropped.
    #[serde(default = "default_subscription_buffer")]
    pub subscription_buffer: usize,
}

impl StoreConfig {
    /// The per-call timeout as a [`Duration`].
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout(),
            subscription_buffer: default_subscription_buffer(),
        }
    }
}

fn default_operation_timeout() -> u64 {
    5_000
}

fn default_subscription_buffer() -> usize {
    64
}
