//! Principal (user profile) domain entities.

pub mod model;
pub mod role;

pub use model::{NewPrincipal, Principal};
pub use role::UserRole;
