//! Capability traits consumed from the hosted platform and implemented
//! by adapter crates.

pub mod auth_provider;
pub mod document_store;
pub mod location;
pub mod weather;

pub use auth_provider::AuthProvider;
pub use document_store::{
    DeleteOutcome, Document, DocumentStore, Fields, Precondition, Snapshot, Subscription,
    WriteOutcome,
};
pub use location::LocationProvider;
pub use weather::{Coordinates, CurrentWeather, ForecastEntry, WeatherAlert, WeatherProvider};
