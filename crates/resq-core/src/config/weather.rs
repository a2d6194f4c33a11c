//! Weather and geolocation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// OpenWeatherMap client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the weather API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key sent as the `appid` query parameter.
    #[serde(default)]
    pub api_key: String,
    /// Unit system: `"metric"`, `"imperial"`, or `"standard"`.
    #[serde(default = "default_units")]
    pub units: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl WeatherConfig {
    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            units: default_units(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Position lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Upper bound on a position fix, in milliseconds.
    #[serde(default = "default_geo_timeout")]
    pub timeout_ms: u64,
    /// Latitude reported by the fixed provider, if configured.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude reported by the fixed provider, if configured.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl GeolocationConfig {
    /// The position timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_geo_timeout(),
            latitude: None,
            longitude: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_geo_timeout() -> u64 {
    10_000
}
