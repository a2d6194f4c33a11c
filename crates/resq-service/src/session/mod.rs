//! Client session: sign-in state and the resolved acting principal.

pub mod service;

pub use service::{RegisterRequest, SessionService};
