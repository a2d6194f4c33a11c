//! Weather lookup.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use resq_core::config::AppConfig;
use resq_core::error::AppError;
use resq_core::traits::Coordinates;
use resq_weather::display::{icon_class, severity_class, wind_direction};
use resq_weather::{FixedLocationProvider, OpenWeatherClient, WeatherService, WeatherState};

use crate::output::{self, OutputFormat};

/// Arguments for the weather command
#[derive(Debug, Args)]
pub struct WeatherArgs {
    /// Latitude; falls back to the configured position
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude; falls back to the configured position
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

/// Current conditions as shown on the dashboard panel.
#[derive(Debug, Serialize)]
struct ConditionsView {
    location: String,
    temperature: String,
    feels_like: String,
    conditions: String,
    icon: &'static str,
    humidity: String,
    wind: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ForecastRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Conditions")]
    description: String,
}

#[derive(Debug, Serialize, Tabled)]
struct AlertRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Level")]
    level: &'static str,
    #[tabled(rename = "From")]
    sender: String,
}

/// Execute the weather command
pub async fn execute(
    args: &WeatherArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = OpenWeatherClient::new(&config.weather)?;
    let service = WeatherService::new(
        Arc::new(client),
        Arc::new(FixedLocationProvider::from_config(&config.geolocation)),
        config.weather.timeout(),
        config.geolocation.timeout(),
    );

    let at = args.lat.zip(args.lon).map(|(lat, lon)| Coordinates::new(lat, lon));
    let report = service.report(at).await;

    if format == OutputFormat::Json {
        output::print_item(&report, format);
        return Ok(());
    }

    let weather = match &report.current {
        WeatherState::Available(weather) => weather,
        WeatherState::Unavailable { reason } => {
            output::print_warning(reason);
            return Ok(());
        }
    };

    let location = match &weather.country {
        Some(country) => format!("{}, {country}", weather.location_name),
        None => weather.location_name.clone(),
    };
    output::print_item(
        &ConditionsView {
            location,
            temperature: format!("{:.0}°", weather.temperature),
            feels_like: format!("{:.0}°", weather.feels_like),
            conditions: weather.description.clone(),
            icon: icon_class(&weather.icon),
            humidity: format!("{}%", weather.humidity),
            wind: format!(
                "{:.1} m/s {}",
                weather.wind_speed,
                wind_direction(weather.wind_degrees)
            ),
        },
        format,
    );

    let forecast: Vec<ForecastRow> = report
        .forecast
        .iter()
        .take(8)
        .map(|f| ForecastRow {
            time: f.time.format("%a %H:%M").to_string(),
            temperature: format!("{:.0}°", f.temperature),
            description: f.description.clone(),
        })
        .collect();
    output::print_heading("Forecast");
    output::print_list(&forecast, format);

    if !report.alerts.is_empty() {
        let alerts: Vec<AlertRow> = report
            .alerts
            .iter()
            .map(|a| AlertRow {
                event: a.event.clone(),
                level: severity_class(a.severity.as_deref()),
                sender: a.sender.clone(),
            })
            .collect();
        output::print_heading("Alerts");
        output::print_list(&alerts, format);
    }
    Ok(())
}
