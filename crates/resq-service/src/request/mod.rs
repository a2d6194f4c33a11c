//! Request lifecycle manager.

pub mod service;

pub use service::{CreateRequest, RequestService};
