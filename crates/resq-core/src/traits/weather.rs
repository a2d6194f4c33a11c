//! Weather provider trait and the value types it returns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Place name reported by the provider.
    pub location_name: String,
    /// Country code, if reported.
    pub country: Option<String>,
    /// Air temperature in the configured units.
    pub temperature: f64,
    /// Perceived temperature.
    pub feels_like: f64,
    /// Relative humidity in percent.
    pub humidity: u32,
    /// Atmospheric pressure in hPa.
    pub pressure: u32,
    /// Wind speed in the configured units.
    pub wind_speed: f64,
    /// Wind direction in meteorological degrees.
    pub wind_degrees: f64,
    /// Visibility in meters.
    pub visibility: Option<u32>,
    /// Human-readable description ("light rain").
    pub description: String,
    /// Provider icon code ("10d").
    pub icon: String,
    /// Sunrise time.
    pub sunrise: Option<DateTime<Utc>>,
    /// Sunset time.
    pub sunset: Option<DateTime<Utc>>,
}

/// One step of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Forecast time.
    pub time: DateTime<Utc>,
    /// Temperature at that time.
    pub temperature: f64,
    /// Human-readable description.
    pub description: String,
    /// Provider icon code.
    pub icon: String,
}

/// A severe-weather alert issued for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    /// Issuing agency.
    pub sender: String,
    /// Alert headline ("Flood Warning").
    pub event: String,
    /// Start of the alert period.
    pub start: Option<DateTime<Utc>>,
    /// End of the alert period.
    pub end: Option<DateTime<Utc>>,
    /// Full alert text.
    pub description: String,
    /// Severity label ("Extreme", "Severe", "Moderate", "Minor") if known.
    pub severity: Option<String>,
}

/// Read-only weather data source.
///
/// Independent of the request lifecycle: failures degrade the weather
/// display and never block lifecycle operations.
#[async_trait]
pub trait WeatherProvider: Send + Sync + 'static {
    /// Current conditions at the given position.
    async fn current_weather(&self, at: Coordinates) -> AppResult<CurrentWeather>;

    /// Short-range forecast at the given position.
    async fn forecast(&self, at: Coordinates) -> AppResult<Vec<ForecastEntry>>;

    /// Active alerts at the given position.
    async fn alerts(&self, at: Coordinates) -> AppResult<Vec<WeatherAlert>>;
}
