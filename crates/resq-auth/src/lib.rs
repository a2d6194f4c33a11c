//! # resq-auth
//!
//! Authentication and authorization for ResQ.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and registration policy
//! - `provider` — in-memory [`AuthProvider`](resq_core::traits::AuthProvider)
//! - `rbac` — which request actions each role may perform
//! - `gate` — route-level access decisions for the current session

pub mod gate;
pub mod password;
pub mod provider;
pub mod rbac;

pub use gate::{AccessDecision, Route, SessionState, can_access, can_access_path, is_allowed};
pub use password::{PasswordHasher, PasswordValidator};
pub use provider::{AccountRegistry, MemoryAuthProvider};
pub use rbac::{RbacEnforcer, RbacPolicies, RequestPermission};
