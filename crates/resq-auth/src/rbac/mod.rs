//! Role-based access control over request actions.

pub mod enforcer;
pub mod policies;

pub use enforcer::RbacEnforcer;
pub use policies::{RbacPolicies, RequestPermission};
