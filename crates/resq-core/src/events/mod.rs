//! Domain events emitted by lifecycle transitions.
//!
//! Events are consumed by the notification rules, which decide who is
//! told about each transition.

pub mod request;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::id::UserId;

pub use request::RequestEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The principal who caused the event.
    pub actor_id: UserId,
    /// Display name of the actor, used in notification copy.
    pub actor_name: String,
    /// The event payload.
    pub payload: RequestEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: UserId, actor_name: impl Into<String>, payload: RequestEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            actor_name: actor_name.into(),
            payload,
        }
    }
}
