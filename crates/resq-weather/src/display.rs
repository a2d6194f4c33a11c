//! Presentation helpers for weather data.

/// Icon class for an OpenWeatherMap icon code.
pub fn icon_class(code: &str) -> &'static str {
    match code {
        "01d" => "fas fa-sun",
        "01n" => "fas fa-moon",
        "02d" => "fas fa-cloud-sun",
        "02n" => "fas fa-cloud-moon",
        "03d" | "03n" | "04d" | "04n" => "fas fa-cloud",
        "09d" | "09n" => "fas fa-cloud-rain",
        "10d" => "fas fa-cloud-sun-rain",
        "10n" => "fas fa-cloud-moon-rain",
        "11d" | "11n" => "fas fa-bolt",
        "13d" | "13n" => "fas fa-snowflake",
        "50d" | "50n" => "fas fa-smog",
        _ => "fas fa-cloud",
    }
}

/// Style class for an alert severity label.
pub fn severity_class(severity: Option<&str>) -> &'static str {
    match severity {
        Some("Extreme") => "danger",
        Some("Severe") => "warning",
        Some("Moderate") => "info",
        Some("Minor") => "success",
        _ => "secondary",
    }
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Sixteen-point compass label for a wind bearing in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = (normalized / 22.5).round() as usize % COMPASS.len();
    COMPASS[index]
}
