//! OpenWeatherMap HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use resq_core::config::WeatherConfig;
use resq_core::error::{AppError, ErrorKind};
use resq_core::result::AppResult;
use resq_core::traits::{
    Coordinates, CurrentWeather, ForecastEntry, WeatherAlert, WeatherProvider,
};

use crate::response::{AlertsResponse, CurrentResponse, ForecastResponse};

/// Weather provider backed by the OpenWeatherMap REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    /// Build a client with the configured timeout.
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build weather HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        })
    }

    /// Full request URL for an endpoint at a position.
    ///
    /// The alerts endpoint takes no unit system.
    pub fn endpoint_url(
        &self,
        endpoint: &str,
        at: Coordinates,
        extra: &[(&str, &str)],
    ) -> AppResult<Url> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();
        let mut params: Vec<(&str, &str)> = vec![("lat", &lat), ("lon", &lon)];
        params.extend_from_slice(extra);
        params.push(("appid", &self.api_key));

        Url::parse_with_params(&format!("{}/{endpoint}", self.base_url), &params).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid weather URL for '{endpoint}'"),
                e,
            )
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> AppResult<T> {
        if self.api_key.is_empty() {
            return Err(AppError::configuration("Weather API key is not configured"));
        }

        debug!(endpoint, "Fetching weather data");
        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Weather request to '{endpoint}' failed"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "Weather API returned an error");
            return Err(AppError::external(format!(
                "Weather API '{endpoint}' returned {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Malformed weather response from '{endpoint}'"),
                e,
            )
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, at: Coordinates) -> AppResult<CurrentWeather> {
        let url = self.endpoint_url("weather", at, &[("units", &self.units)])?;
        let body: CurrentResponse = self.fetch("weather", url).await?;
        Ok(body.into())
    }

    async fn forecast(&self, at: Coordinates) -> AppResult<Vec<ForecastEntry>> {
        let url = self.endpoint_url("forecast", at, &[("units", &self.units)])?;
        let body: ForecastResponse = self.fetch("forecast", url).await?;
        Ok(body.into_entries())
    }

    async fn alerts(&self, at: Coordinates) -> AppResult<Vec<WeatherAlert>> {
        let url = self.endpoint_url(
            "onecall",
            at,
            &[("exclude", "current,minutely,hourly,daily")],
        )?;
        let body: AlertsResponse = self.fetch("onecall", url).await?;
        Ok(body.alerts.into_iter().map(WeatherAlert::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: &str) -> OpenWeatherClient {
        OpenWeatherClient::new(&WeatherConfig {
            base_url: "https://weather.test/data/2.5/".to_string(),
            api_key: api_key.to_string(),
            ..WeatherConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_current_url_carries_units_and_key() {
        let c = client("k3y");
        let url = c
            .endpoint_url("weather", Coordinates::new(14.6, 121.0), &[("units", "metric")])
            .unwrap();
        assert_eq!(url.path(), "/data/2.5/weather");
        let query = url.query().unwrap();
        assert!(query.contains("lat=14.6"));
        assert!(query.contains("lon=121"));
        assert!(query.contains("units=metric"));
        assert!(query.ends_with("appid=k3y"));
    }

    #[test]
    fn test_alerts_url_excludes_other_sections() {
        let c = client("k3y");
        let url = c
            .endpoint_url(
                "onecall",
                Coordinates::new(0.0, 0.0),
                &[("exclude", "current,minutely,hourly,daily")],
            )
            .unwrap();
        assert!(!url.query().unwrap().contains("units"));
        assert!(url.query().unwrap().contains("exclude=current%2Cminutely%2Chourly%2Cdaily"));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let err = client("")
            .current_weather(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
