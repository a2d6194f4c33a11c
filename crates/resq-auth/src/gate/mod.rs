//! Route-level authorization gate.
//!
//! The gate is a pure decision over a static route table and the current
//! session. It never performs I/O; callers resolve the session first and
//! re-evaluate whenever it changes.

pub mod decision;
pub mod route;
pub mod session;

pub use decision::{AccessDecision, can_access, can_access_path, is_allowed};
pub use route::Route;
pub use session::SessionState;
