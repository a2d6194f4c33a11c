//! OpenWeatherMap response payloads and their conversion into the
//! provider-neutral models.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use resq_core::traits::{CurrentWeather, ForecastEntry, WeatherAlert};

#[derive(Debug, Deserialize)]
pub(crate) struct Condition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Body of `GET /weather`.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    #[serde(default)]
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub wind: Wind,
    pub visibility: Option<u32>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub sys: Sys,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastItem {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// Body of `GET /forecast`.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlertItem {
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub event: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
    #[serde(default)]
    pub description: String,
    pub severity: Option<String>,
}

/// Body of `GET /onecall` restricted to alerts.
#[derive(Debug, Deserialize)]
pub(crate) struct AlertsResponse {
    #[serde(default)]
    pub alerts: Vec<AlertItem>,
}

fn epoch(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

fn first_condition(conditions: &[Condition]) -> (String, String) {
    conditions
        .first()
        .map(|c| (c.description.clone(), c.icon.clone()))
        .unwrap_or_default()
}

impl From<CurrentResponse> for CurrentWeather {
    fn from(r: CurrentResponse) -> Self {
        let (description, icon) = first_condition(&r.weather);
        Self {
            location_name: r.name,
            country: r.sys.country,
            temperature: r.main.temp,
            feels_like: r.main.feels_like,
            humidity: r.main.humidity,
            pressure: r.main.pressure,
            wind_speed: r.wind.speed,
            wind_degrees: r.wind.deg,
            visibility: r.visibility,
            description,
            icon,
            sunrise: r.sys.sunrise.and_then(epoch),
            sunset: r.sys.sunset.and_then(epoch),
        }
    }
}

impl ForecastResponse {
    pub(crate) fn into_entries(self) -> Vec<ForecastEntry> {
        self.list
            .into_iter()
            .filter_map(|item| {
                let (description, icon) = first_condition(&item.weather);
                Some(ForecastEntry {
                    time: epoch(item.dt)?,
                    temperature: item.main.temp,
                    description,
                    icon,
                })
            })
            .collect()
    }
}

impl From<AlertItem> for WeatherAlert {
    fn from(a: AlertItem) -> Self {
        Self {
            sender: a.sender_name,
            event: a.event,
            start: a.start.and_then(epoch),
            end: a.end.and_then(epoch),
            description: a.description,
            severity: a.severity,
        }
    }
}
