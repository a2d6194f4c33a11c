//! # resq-weather
//!
//! Weather conditions for the volunteer and citizen dashboards. Weather is
//! read-only and best-effort: nothing here can block a request lifecycle
//! operation, and every failure degrades to an explicit unavailable state.

pub mod client;
pub mod display;
pub mod location;
pub mod response;
pub mod service;

pub use client::OpenWeatherClient;
pub use location::FixedLocationProvider;
pub use service::{WeatherReport, WeatherService, WeatherState};
