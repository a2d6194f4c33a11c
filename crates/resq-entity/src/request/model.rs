//! Help request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resq_core::types::id::{RequestId, UserId};

use super::kind::{RequestPriority, RequestType};
use super::status::RequestStatus;

/// Document field names, for filters, preconditions, and patches.
pub mod fields {
    /// Owner of the request.
    pub const REQUESTER_ID: &str = "requester_id";
    /// Lifecycle status.
    pub const STATUS: &str = "status";
    /// Assigned volunteer.
    pub const VOLUNTEER_ID: &str = "volunteer_id";
    /// Admin who force-assigned the request.
    pub const ASSIGNED_BY: &str = "assigned_by";
    /// Canonical urgency flag.
    pub const URGENT: &str = "urgent";
    /// Creation time.
    pub const CREATED_AT: &str = "created_at";
    /// Assignment time.
    pub const ASSIGNED_AT: &str = "assigned_at";
    /// Completion time.
    pub const COMPLETED_AT: &str = "completed_at";
    /// Last urgency change.
    pub const PRIORITY_UPDATED_AT: &str = "priority_updated_at";
}

/// A citizen's request for help, tracked through its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpRequest {
    /// Store-assigned identifier.
    pub id: RequestId,
    /// Store revision of this record.
    #[serde(default)]
    pub version: u64,
    /// The citizen who created the request.
    pub requester_id: UserId,
    /// Kind of help requested.
    pub request_type: RequestType,
    /// Free-text details.
    pub description: String,
    /// Free-text address or landmark.
    pub location: String,
    /// Urgency chosen at creation. Never changes.
    pub priority: RequestPriority,
    /// Admin-controlled urgency flag.
    #[serde(default)]
    pub urgent: bool,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Volunteer holding the request; `None` iff status is Submitted.
    #[serde(default)]
    pub volunteer_id: Option<UserId>,
    /// Admin who last force-assigned the request.
    #[serde(default)]
    pub assigned_by: Option<UserId>,
    /// When the request was created.
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
    /// When the request was (last) assigned.
    #[serde(default, with = "chrono::serde::ts_microseconds_option")]
    pub assigned_at: Option<DateTime<Utc>>,
    /// When the request was completed.
    #[serde(default, with = "chrono::serde::ts_microseconds_option")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the urgent flag last changed.
    #[serde(default, with = "chrono::serde::ts_microseconds_option")]
    pub priority_updated_at: Option<DateTime<Utc>>,
}

impl HelpRequest {
    /// Check if the given principal authored this request.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.requester_id == user_id
    }

    /// Check if the given principal is the assigned volunteer.
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.volunteer_id == Some(user_id)
    }

    /// Check the record-level invariants.
    ///
    /// Returns a description of the first violation, if any.
    pub fn invariant_violation(&self) -> Option<String> {
        let submitted = self.status == RequestStatus::Submitted;
        if submitted == self.volunteer_id.is_some() {
            return Some(format!(
                "volunteer_id must be set exactly when status is past Submitted (status {})",
                self.status
            ));
        }
        if let Some(assigned_at) = self.assigned_at {
            if assigned_at < self.created_at {
                return Some("assigned_at precedes created_at".to_string());
            }
        }
        if let Some(completed_at) = self.completed_at {
            let floor = self.assigned_at.unwrap_or(self.created_at);
            if completed_at < floor {
                return Some("completed_at precedes assigned_at".to_string());
            }
        }
        if self.status == RequestStatus::Completed && self.completed_at.is_none() {
            return Some("completed request has no completed_at".to_string());
        }
        None
    }
}

/// Fields written when a request is created. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHelpRequest {
    /// The citizen creating the request.
    pub requester_id: UserId,
    /// Kind of help requested.
    pub request_type: RequestType,
    /// Free-text details.
    pub description: String,
    /// Free-text address or landmark.
    pub location: String,
    /// Creation-time urgency.
    pub priority: RequestPriority,
    /// Starts `false`; only admins change it.
    pub urgent: bool,
    /// Always Submitted.
    pub status: RequestStatus,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
}

impl NewHelpRequest {
    /// Build a Submitted request stamped with the current time.
    pub fn submitted(
        requester_id: UserId,
        request_type: RequestType,
        description: String,
        location: String,
        priority: RequestPriority,
    ) -> Self {
        Self {
            requester_id,
            request_type,
            description,
            location,
            priority,
            urgent: false,
            status: RequestStatus::Submitted,
            created_at: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> HelpRequest {
        HelpRequest {
            id: RequestId::new(),
            version: 1,
            requester_id: UserId::new(),
            request_type: RequestType::Medicine,
            description: "Insulin needed".to_string(),
            location: "12 Elm St".to_string(),
            priority: RequestPriority::High,
            urgent: false,
            status: RequestStatus::Submitted,
            volunteer_id: None,
            assigned_by: None,
            created_at: crate::time::now(),
            assigned_at: None,
            completed_at: None,
            priority_updated_at: None,
        }
    }

    #[test]
    fn test_fresh_request_is_consistent() {
        assert_eq!(sample().invariant_violation(), None);
    }

    #[test]
    fn test_assigned_without_volunteer_is_flagged() {
        let mut r = sample();
        r.status = RequestStatus::Assigned;
        assert!(r.invariant_violation().is_some());
    }

    #[test]
    fn test_timestamps_stored_as_micros() {
        let r = sample();
        let value = serde_json::to_value(&r).unwrap();
        assert!(value["created_at"].is_i64());
        assert_eq!(value["assigned_at"], json!(null));
        let back: HelpRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, r);
    }
}
