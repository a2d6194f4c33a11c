//! Help-request lifecycle events.

use serde::{Deserialize, Serialize};

use crate::types::id::{RequestId, UserId};

/// A transition that happened to a help request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    /// A volunteer claimed a submitted request.
    Claimed {
        /// The request.
        request_id: RequestId,
        /// Kind of help requested (`"food"`, `"medicine"`, ...).
        request_type: String,
        /// The citizen who asked for help.
        requester_id: UserId,
        /// The volunteer who claimed it.
        volunteer_id: UserId,
    },
    /// An admin assigned the request to a volunteer.
    Reassigned {
        /// The request.
        request_id: RequestId,
        /// Kind of help requested.
        request_type: String,
        /// The citizen who asked for help.
        requester_id: UserId,
        /// The newly assigned volunteer.
        volunteer_id: UserId,
        /// The volunteer who held it before, if a different one did.
        displaced_volunteer_id: Option<UserId>,
    },
    /// The request was completed.
    Completed {
        /// The request.
        request_id: RequestId,
        /// Kind of help requested.
        request_type: String,
        /// The citizen who asked for help.
        requester_id: UserId,
        /// The volunteer who held it.
        volunteer_id: UserId,
    },
    /// An admin changed the urgent flag.
    UrgencyChanged {
        /// The request.
        request_id: RequestId,
        /// The new flag value.
        urgent: bool,
    },
    /// An admin deleted a submitted request.
    Deleted {
        /// The request.
        request_id: RequestId,
        /// Kind of help requested.
        request_type: String,
        /// The citizen who asked for help.
        requester_id: UserId,
    },
}

impl RequestEvent {
    /// The request this event concerns.
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Claimed { request_id, .. }
            | Self::Reassigned { request_id, .. }
            | Self::Completed { request_id, .. }
            | Self::UrgencyChanged { request_id, .. }
            | Self::Deleted { request_id, .. } => *request_id,
        }
    }

    /// Short event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Claimed { .. } => "claimed",
            Self::Reassigned { .. } => "reassigned",
            Self::Completed { .. } => "completed",
            Self::UrgencyChanged { .. } => "urgency_changed",
            Self::Deleted { .. } => "deleted",
        }
    }
}
