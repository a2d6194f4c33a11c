//! # resq-store
//!
//! Document storage for ResQ. Provides an in-memory implementation of
//! [`DocumentStore`](resq_core::traits::DocumentStore) with atomic
//! conditional writes and live query subscriptions, the client-side
//! [`LiveView`] merge used by dashboards, and typed repositories for the
//! `users`, `requests`, and `notifications` collections.

pub mod bounded;
pub mod codec;
pub mod live;
pub mod memory;
pub mod repositories;

pub use bounded::bounded;
pub use live::LiveView;
pub use memory::MemoryDocumentStore;
pub use repositories::{Guarded, NotificationRepository, RequestRepository, UserRepository};

/// Collection holding principal profiles.
pub const USERS: &str = "users";
/// Collection holding help requests.
pub const REQUESTS: &str = "requests";
/// Collection holding notifications.
pub const NOTIFICATIONS: &str = "notifications";
