//! Help request lifecycle.
//!
//! Every mutation follows the same shape: check the actor's permission,
//! read the current record, consult the transition table, then issue one
//! conditional write guarded on the state that was observed. Losing a race
//! surfaces as a conflict and leaves the record untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use resq_auth::rbac::{RbacEnforcer, RequestPermission};
use resq_core::error::{AppError, ErrorKind};
use resq_core::events::{DomainEvent, RequestEvent};
use resq_core::traits::Precondition;
use resq_core::types::id::{RequestId, UserId};
use resq_entity::request::model::fields;
use resq_entity::request::{
    HelpRequest, NewHelpRequest, RequestAction, RequestPriority, RequestStatus, RequestType,
};
use resq_entity::time;
use resq_entity::user::UserRole;
use resq_store::codec::{self, Patch};
use resq_store::{Guarded, RequestRepository};

use crate::context::ActorContext;
use crate::directory::DirectoryService;
use crate::notification::NotificationDispatcher;

/// Raw input of the request-help form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Kind of help (`"food"`, `"medicine"`, ...).
    pub request_type: String,
    /// Free-text details.
    pub description: String,
    /// Free-text address or landmark.
    pub location: String,
    /// Creation-time priority; blank means medium.
    #[serde(default)]
    pub priority: String,
}

/// Owns the help request state machine.
#[derive(Debug)]
pub struct RequestService {
    /// Request repository.
    request_repo: Arc<RequestRepository>,
    /// Directory for volunteer lookups.
    directory: Arc<DirectoryService>,
    /// Notification fan-out.
    dispatcher: Arc<NotificationDispatcher>,
    /// Role checks.
    rbac: RbacEnforcer,
}

impl RequestService {
    /// Creates a new request service.
    pub fn new(
        request_repo: Arc<RequestRepository>,
        directory: Arc<DirectoryService>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            request_repo,
            directory,
            dispatcher,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Submits a new help request on behalf of a citizen.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        form: CreateRequest,
    ) -> Result<HelpRequest, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::Create)?;

        let request_type: RequestType = form.request_type.parse()?;
        let description = form.description.trim();
        if description.is_empty() {
            return Err(AppError::validation("Description is required"));
        }
        let location = form.location.trim();
        if location.is_empty() {
            return Err(AppError::validation("Location is required"));
        }
        let priority: RequestPriority = form.priority.parse()?;

        let new_request = NewHelpRequest::submitted(
            ctx.user_id,
            request_type,
            description.to_string(),
            location.to_string(),
            priority,
        );
        let request = self.request_repo.create(&new_request).await?;

        info!(
            request_id = %request.id,
            requester_id = %ctx.user_id,
            request_type = %request.request_type,
            priority = %request.priority,
            "Help request submitted"
        );
        Ok(request)
    }

    /// Reads one request the actor is allowed to see.
    pub async fn get(&self, ctx: &ActorContext, id: RequestId) -> Result<HelpRequest, AppError> {
        let request = self.request_repo.get(id).await?;
        let visible = match ctx.role {
            UserRole::Admin => true,
            UserRole::Citizen => request.is_owned_by(ctx.user_id),
            UserRole::Volunteer => {
                request.is_assigned_to(ctx.user_id) || request.status == RequestStatus::Submitted
            }
        };
        if !visible {
            return Err(AppError::authorization(format!(
                "Request {id} is not visible to this user"
            )));
        }
        Ok(request)
    }

    /// A volunteer takes an unclaimed request.
    ///
    /// Of several concurrent claims on the same request exactly one wins;
    /// the others fail with a conflict.
    pub async fn claim(&self, ctx: &ActorContext, id: RequestId) -> Result<HelpRequest, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::Claim)?;

        let current = self.request_repo.get(id).await?;
        RequestAction::Claim.apply(current.status)?;

        let patch = Patch::new()
            .set(fields::STATUS, RequestStatus::Assigned.as_str())
            .set(fields::VOLUNTEER_ID, ctx.user_id.to_string())
            .set_time(fields::ASSIGNED_AT, time::not_before(current.created_at));
        let updated = self
            .guarded_update(id, RequestAction::Claim, patch, guard_for(RequestAction::Claim, &current))
            .await?;

        info!(request_id = %id, volunteer_id = %ctx.user_id, "Request claimed");
        self.publish(
            ctx,
            RequestEvent::Claimed {
                request_id: id,
                request_type: updated.request_type.to_string(),
                requester_id: updated.requester_id,
                volunteer_id: ctx.user_id,
            },
        )
        .await;
        Ok(updated)
    }

    /// An admin assigns a request to a volunteer, overriding any current
    /// assignment. Completed requests cannot be reassigned.
    pub async fn reassign(
        &self,
        ctx: &ActorContext,
        id: RequestId,
        volunteer_id: UserId,
    ) -> Result<HelpRequest, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::Reassign)?;
        let volunteer = self.directory.require_volunteer(volunteer_id).await?;

        let current = self.request_repo.get(id).await?;
        RequestAction::Reassign.apply(current.status)?;

        let patch = Patch::new()
            .set(fields::STATUS, RequestStatus::Assigned.as_str())
            .set(fields::VOLUNTEER_ID, volunteer.id.to_string())
            .set(fields::ASSIGNED_BY, ctx.user_id.to_string())
            .set_time(fields::ASSIGNED_AT, time::not_before(current.created_at));
        let updated = self
            .guarded_update(
                id,
                RequestAction::Reassign,
                patch,
                guard_for(RequestAction::Reassign, &current),
            )
            .await?;

        let displaced = current.volunteer_id.filter(|previous| *previous != volunteer.id);
        info!(
            request_id = %id,
            volunteer_id = %volunteer.id,
            displaced = ?displaced,
            admin_id = %ctx.user_id,
            "Request reassigned"
        );
        self.publish(
            ctx,
            RequestEvent::Reassigned {
                request_id: id,
                request_type: updated.request_type.to_string(),
                requester_id: updated.requester_id,
                volunteer_id: volunteer.id,
                displaced_volunteer_id: displaced,
            },
        )
        .await;
        Ok(updated)
    }

    /// The assigned volunteer or an admin marks a request completed.
    pub async fn complete(
        &self,
        ctx: &ActorContext,
        id: RequestId,
    ) -> Result<HelpRequest, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::Complete)?;

        let current = self.request_repo.get(id).await?;
        RequestAction::Complete.apply(current.status)?;
        if !ctx.is_admin() && !current.is_assigned_to(ctx.user_id) {
            return Err(AppError::authorization(
                "Only the assigned volunteer or an admin can complete this request",
            ));
        }
        let Some(volunteer_id) = current.volunteer_id else {
            return Err(AppError::internal(format!(
                "Assigned request {id} has no volunteer"
            )));
        };

        let floor = current.assigned_at.unwrap_or(current.created_at);
        let patch = Patch::new()
            .set(fields::STATUS, RequestStatus::Completed.as_str())
            .set_time(fields::COMPLETED_AT, time::not_before(floor));
        let guard = guard_for(RequestAction::Complete, &current).and(Precondition::field_equals(
            fields::VOLUNTEER_ID,
            volunteer_id.to_string(),
        ));
        let updated = self
            .guarded_update(id, RequestAction::Complete, patch, guard)
            .await?;

        info!(request_id = %id, actor_id = %ctx.user_id, "Request completed");
        self.publish(
            ctx,
            RequestEvent::Completed {
                request_id: id,
                request_type: updated.request_type.to_string(),
                requester_id: updated.requester_id,
                volunteer_id,
            },
        )
        .await;
        Ok(updated)
    }

    /// An admin sets or clears the urgent flag.
    ///
    /// `priority_updated_at` strictly increases with every call. The write
    /// is guarded on that timestamp alone, so it never conflicts with a
    /// concurrent claim or completion.
    pub async fn set_urgent(
        &self,
        ctx: &ActorContext,
        id: RequestId,
        urgent: bool,
    ) -> Result<HelpRequest, AppError> {
        self.rbac
            .require_permission(ctx.role, RequestPermission::SetUrgent)?;

        let current = self.request_repo.get(id).await?;
        RequestAction::SetUrgent.apply(current.status)?;

        let patch = Patch::new().set(fields::URGENT, urgent).set_time(
            fields::PRIORITY_UPDATED_AT,
            time::strictly_after(current.priority_updated_at),
        );
        let last_change = current
            .priority_updated_at
            .map(codec::timestamp)
            .unwrap_or(Value::Null);
        let updated = self
            .guarded_update(
                id,
                RequestAction::SetUrgent,
                patch,
                Precondition::field_equals(fields::PRIORITY_UPDATED_AT, last_change),
            )
            .await?;

        info!(request_id = %id, urgent, admin_id = %ctx.user_id, "Urgency updated");
        self.publish(
            ctx,
            RequestEvent::UrgencyChanged {
                request_id: id,
                urgent,
            },
        )
        .await;
        Ok(updated)
    }

    /// An admin removes a request nobody has claimed yet.
    pub async fn delete(&self, ctx: &ActorContext, id: RequestId) -> Result<(), AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::Delete)?;

        let current = self.request_repo.get(id).await?;
        RequestAction::Delete.apply(current.status)?;

        let outcome = self
            .request_repo
            .delete(id, guard_for(RequestAction::Delete, &current))
            .await
            .map_err(|e| vanished(e, id))?;
        if let Guarded::Conflict(now) = outcome {
            return Err(lost_race(RequestAction::Delete, &now));
        }

        info!(request_id = %id, admin_id = %ctx.user_id, "Request deleted");
        self.publish(
            ctx,
            RequestEvent::Deleted {
                request_id: id,
                request_type: current.request_type.to_string(),
                requester_id: current.requester_id,
            },
        )
        .await;
        Ok(())
    }

    async fn guarded_update(
        &self,
        id: RequestId,
        action: RequestAction,
        patch: Patch,
        guard: Precondition,
    ) -> Result<HelpRequest, AppError> {
        match self
            .request_repo
            .update(id, patch, guard)
            .await
            .map_err(|e| vanished(e, id))?
        {
            Guarded::Applied(updated) => Ok(updated),
            Guarded::Conflict(now) => Err(lost_race(action, &now)),
        }
    }

    async fn publish(&self, ctx: &ActorContext, payload: RequestEvent) {
        let event = DomainEvent::new(ctx.user_id, ctx.display_name.clone(), payload);
        let delivered = self.dispatcher.dispatch(&event).await;
        debug!(event = event.payload.name(), delivered, "Lifecycle event published");
    }
}

/// The stored state a write for `action` is conditioned on: the status the
/// transition table requires, or the revision that was read.
fn guard_for(action: RequestAction, current: &HelpRequest) -> Precondition {
    match action.required_status() {
        Some(status) => Precondition::field_equals(fields::STATUS, status.as_str()),
        None => Precondition::version(current.version),
    }
}

/// A record deleted between our read and our write is no longer available.
fn vanished(err: AppError, id: RequestId) -> AppError {
    if err.is(ErrorKind::NotFound) {
        AppError::conflict(format!("Request {id} was removed"))
    } else {
        err
    }
}

fn lost_race(action: RequestAction, current: &HelpRequest) -> AppError {
    debug!(
        request_id = %current.id,
        action = %action,
        status = %current.status,
        version = current.version,
        "Conditional write lost a race"
    );
    AppError::conflict(format!(
        "Cannot {action} request {}: it changed to {} in the meantime",
        current.id, current.status
    ))
}
