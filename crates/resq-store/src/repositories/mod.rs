//! Typed repositories over the document store.
//!
//! Every store call is bounded by the configured operation timeout so a
//! hung backend surfaces as an external-service error instead of a stuck
//! caller.

pub mod notification;
pub mod request;
pub mod user;

pub use notification::NotificationRepository;
pub use request::RequestRepository;
pub use user::UserRepository;

/// Result of a guarded write.
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<A, C = A> {
    /// The write was applied.
    Applied(A),
    /// The guard failed; carries the record as currently stored.
    Conflict(C),
}

impl<A, C> Guarded<A, C> {
    /// Whether the write was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}
