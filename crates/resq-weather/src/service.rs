//! Best-effort weather for the dashboards.
//!
//! Every provider call runs under a timeout. Failures never propagate: the
//! current conditions degrade to [`WeatherState::Unavailable`], forecast and
//! alerts degrade to empty lists.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::{
    Coordinates, CurrentWeather, ForecastEntry, LocationProvider, WeatherAlert, WeatherProvider,
};

/// Current conditions, or the reason they cannot be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WeatherState {
    /// Conditions were fetched.
    Available(CurrentWeather),
    /// The provider or position lookup failed.
    Unavailable {
        /// User-facing explanation.
        reason: String,
    },
}

impl WeatherState {
    /// Whether conditions are shown.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Everything the weather panel renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Position the report was fetched for.
    pub position: Option<Coordinates>,
    /// Current conditions.
    pub current: WeatherState,
    /// Upcoming forecast steps.
    pub forecast: Vec<ForecastEntry>,
    /// Active alerts.
    pub alerts: Vec<WeatherAlert>,
}

impl WeatherReport {
    fn unavailable(position: Option<Coordinates>, reason: impl Into<String>) -> Self {
        Self {
            position,
            current: WeatherState::Unavailable {
                reason: reason.into(),
            },
            forecast: Vec::new(),
            alerts: Vec::new(),
        }
    }
}

/// Combines the position lookup with the weather provider.
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    location: Arc<dyn LocationProvider>,
    request_timeout: Duration,
    location_timeout: Duration,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("request_timeout", &self.request_timeout)
            .field("location_timeout", &self.location_timeout)
            .finish()
    }
}

async fn within<T>(
    limit: Duration,
    operation: &'static str,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::external(format!(
            "{operation} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

impl WeatherService {
    /// Create a new weather service.
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        location: Arc<dyn LocationProvider>,
        request_timeout: Duration,
        location_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            location,
            request_timeout,
            location_timeout,
        }
    }

    /// Look up the current position. `None` if the lookup fails or times out.
    pub async fn locate(&self) -> Option<Coordinates> {
        match within(
            self.location_timeout,
            "Position lookup",
            self.location.current_position(),
        )
        .await
        {
            Ok(position) => Some(position),
            Err(e) => {
                warn!(error = %e, "Position unavailable");
                None
            }
        }
    }

    /// Fetch a report for `at`, or for the looked-up position when `None`.
    pub async fn report(&self, at: Option<Coordinates>) -> WeatherReport {
        let position = match at {
            Some(position) => position,
            None => match self.locate().await {
                Some(position) => position,
                None => return WeatherReport::unavailable(None, "Location unavailable"),
            },
        };

        let (current, forecast, alerts) = tokio::join!(
            within(
                self.request_timeout,
                "Current weather",
                self.provider.current_weather(position),
            ),
            within(
                self.request_timeout,
                "Forecast",
                self.provider.forecast(position),
            ),
            within(self.request_timeout, "Alerts", self.provider.alerts(position)),
        );

        let current = match current {
            Ok(weather) => {
                info!(
                    location = %weather.location_name,
                    temperature = weather.temperature,
                    "Weather updated"
                );
                WeatherState::Available(weather)
            }
            Err(e) => {
                warn!(error = %e, "Current weather unavailable");
                return WeatherReport::unavailable(Some(position), "Weather data unavailable");
            }
        };

        let forecast = forecast.unwrap_or_else(|e| {
            warn!(error = %e, "Forecast unavailable");
            Vec::new()
        });
        let alerts = alerts.unwrap_or_else(|e| {
            warn!(error = %e, "Weather alerts unavailable");
            Vec::new()
        });

        WeatherReport {
            position: Some(position),
            current,
            forecast,
            alerts,
        }
    }
}
