//! # resq-core
//!
//! Core crate for ResQ. Contains the capability traits consumed from the
//! hosted platform (document store, auth, weather, geolocation),
//! configuration schemas, typed identifiers, domain events, query types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other ResQ crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
