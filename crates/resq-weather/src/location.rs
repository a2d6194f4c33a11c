//! Position lookup for hosts without a device location API.

use async_trait::async_trait;

use resq_core::config::GeolocationConfig;
use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::{Coordinates, LocationProvider};

/// Reports the position configured under `[geolocation]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationProvider {
    position: Option<Coordinates>,
}

impl FixedLocationProvider {
    /// A provider that always reports `position`.
    pub fn new(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Build from configuration. Without both coordinates every lookup fails.
    pub fn from_config(config: &GeolocationConfig) -> Self {
        let position = match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> AppResult<Coordinates> {
        self.position
            .ok_or_else(|| AppError::external("Location is not available"))
    }
}
