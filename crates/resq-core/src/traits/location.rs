//! Geolocation provider trait.

use async_trait::async_trait;

use super::weather::Coordinates;
use crate::result::AppResult;

/// One-shot device position lookup.
///
/// Callers bound the call with a timeout; a failure is never fatal.
#[async_trait]
pub trait LocationProvider: Send + Sync + 'static {
    /// Fetch the current position.
    async fn current_position(&self) -> AppResult<Coordinates>;
}
