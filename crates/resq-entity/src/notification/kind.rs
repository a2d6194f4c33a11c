//! Notification type enumeration.

use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A volunteer claimed the citizen's request.
    RequestAccepted,
    /// An admin assigned a request to the volunteer.
    RequestAssigned,
    /// An admin moved the volunteer's request to someone else.
    AssignmentRevoked,
    /// The citizen's request was completed.
    RequestCompleted,
    /// An admin deleted the citizen's request.
    RequestDeleted,
}

impl NotificationType {
    /// Return the type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestAccepted => "request_accepted",
            Self::RequestAssigned => "request_assigned",
            Self::AssignmentRevoked => "assignment_revoked",
            Self::RequestCompleted => "request_completed",
            Self::RequestDeleted => "request_deleted",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
