//! Notification rules: which lifecycle events notify whom, and with what copy.

use serde_json::json;

use resq_core::events::{DomainEvent, RequestEvent};
use resq_core::types::id::{RequestId, UserId};
use resq_entity::notification::{NewNotification, NotificationType};

/// Turns domain events into the notifications they should produce.
///
/// The acting principal is never notified about its own action.
#[derive(Debug, Clone, Default)]
pub struct NotificationRules;

impl NotificationRules {
    /// Creates the rules engine.
    pub fn new() -> Self {
        Self
    }

    /// Notifications to create for `event`, in delivery order.
    pub fn notifications_for(&self, event: &DomainEvent) -> Vec<NewNotification> {
        let mut out = Vec::new();
        match &event.payload {
            RequestEvent::Claimed {
                request_id,
                request_type,
                requester_id,
                ..
            } => out.push(build(
                event,
                *requester_id,
                *request_id,
                NotificationType::RequestAccepted,
                "Request Accepted!",
                format!(
                    "Your {request_type} request has been accepted by {}",
                    event.actor_name
                ),
            )),
            RequestEvent::Reassigned {
                request_id,
                request_type,
                volunteer_id,
                displaced_volunteer_id,
                ..
            } => {
                out.push(build(
                    event,
                    *volunteer_id,
                    *request_id,
                    NotificationType::RequestAssigned,
                    "New Assignment",
                    format!("You have been assigned a {request_type} request"),
                ));
                if let Some(displaced) = displaced_volunteer_id {
                    out.push(build(
                        event,
                        *displaced,
                        *request_id,
                        NotificationType::AssignmentRevoked,
                        "Assignment Changed",
                        format!("A {request_type} request you held was reassigned to another volunteer"),
                    ));
                }
            }
            RequestEvent::Completed {
                request_id,
                request_type,
                requester_id,
                ..
            } => out.push(build(
                event,
                *requester_id,
                *request_id,
                NotificationType::RequestCompleted,
                "Request Completed",
                format!("Your {request_type} request has been completed"),
            )),
            RequestEvent::Deleted {
                request_id,
                request_type,
                requester_id,
            } => out.push(build(
                event,
                *requester_id,
                *request_id,
                NotificationType::RequestDeleted,
                "Request Removed",
                format!("Your {request_type} request was removed by an administrator"),
            )),
            RequestEvent::UrgencyChanged { .. } => {}
        }
        out.retain(|n| n.user_id != event.actor_id);
        out
    }
}

fn build(
    event: &DomainEvent,
    recipient: UserId,
    request_id: RequestId,
    notification_type: NotificationType,
    title: &str,
    message: String,
) -> NewNotification {
    NewNotification::new(recipient, notification_type, title, message)
        .for_request(request_id)
        .with_context(json!({
            "event": event.payload.name(),
            "event_id": event.id,
            "actor_id": event.actor_id,
            "actor_name": event.actor_name,
        }))
}
