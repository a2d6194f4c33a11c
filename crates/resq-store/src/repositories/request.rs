//! Help request repository.

use std::sync::Arc;
use std::time::Duration;

use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::{DeleteOutcome, DocumentStore, Precondition, Subscription, WriteOutcome};
use resq_core::types::filter::FilterField;
use resq_core::types::id::{RequestId, UserId};
use resq_core::types::query::Query;
use resq_core::types::sorting::SortField;
use resq_entity::request::model::fields;
use resq_entity::request::{HelpRequest, NewHelpRequest, RequestStatus};

use super::Guarded;
use crate::codec::{self, Patch};
use crate::{REQUESTS, bounded};

/// Repository for the `requests` collection.
#[derive(Clone)]
pub struct RequestRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl std::fmt::Debug for RequestRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRepository").finish()
    }
}

impl RequestRepository {
    /// Create a new request repository.
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Requests authored by a citizen, newest first.
    pub fn by_requester(requester_id: UserId) -> Query {
        Query::new()
            .filter(FilterField::eq(fields::REQUESTER_ID, requester_id.to_string()))
            .order_by(SortField::desc(fields::CREATED_AT))
    }

    /// Requests held by a volunteer, newest first.
    pub fn assigned_to(volunteer_id: UserId) -> Query {
        Query::new()
            .filter(FilterField::eq(fields::VOLUNTEER_ID, volunteer_id.to_string()))
            .order_by(SortField::desc(fields::CREATED_AT))
    }

    /// Unclaimed requests, newest first.
    pub fn open_pool() -> Query {
        Self::all(Some(RequestStatus::Submitted))
    }

    /// Every request, optionally narrowed to one status, newest first.
    pub fn all(status: Option<RequestStatus>) -> Query {
        let query = Query::new().order_by(SortField::desc(fields::CREATED_AT));
        match status {
            Some(status) => query.filter(FilterField::eq(fields::STATUS, status.as_str())),
            None => query,
        }
    }

    /// Store a new request.
    pub async fn create(&self, request: &NewHelpRequest) -> AppResult<HelpRequest> {
        let fields = codec::to_fields(request)?;
        let doc = bounded(
            self.timeout,
            "create request",
            self.store.create(REQUESTS, fields),
        )
        .await?;
        codec::decode(doc)
    }

    /// Find a request by id.
    pub async fn find_by_id(&self, id: RequestId) -> AppResult<Option<HelpRequest>> {
        let doc = bounded(
            self.timeout,
            "get request",
            self.store.get(REQUESTS, id.into_uuid()),
        )
        .await?;
        doc.map(codec::decode).transpose()
    }

    /// Fetch a request that must exist.
    pub async fn get(&self, id: RequestId) -> AppResult<HelpRequest> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {id} not found")))
    }

    /// Apply a patch if `guard` holds against the stored request.
    pub async fn update(
        &self,
        id: RequestId,
        patch: Patch,
        guard: Precondition,
    ) -> AppResult<Guarded<HelpRequest>> {
        let outcome = bounded(
            self.timeout,
            "update request",
            self.store
                .update(REQUESTS, id.into_uuid(), patch.into_fields(), Some(guard)),
        )
        .await
        .map_err(|e| not_found_as_request(e, id))?;
        Ok(match outcome {
            WriteOutcome::Applied(doc) => Guarded::Applied(codec::decode(doc)?),
            WriteOutcome::Conflict { current } => Guarded::Conflict(codec::decode(current)?),
        })
    }

    /// Remove a request if `guard` holds.
    pub async fn delete(
        &self,
        id: RequestId,
        guard: Precondition,
    ) -> AppResult<Guarded<(), HelpRequest>> {
        let outcome = bounded(
            self.timeout,
            "delete request",
            self.store.delete(REQUESTS, id.into_uuid(), Some(guard)),
        )
        .await
        .map_err(|e| not_found_as_request(e, id))?;
        Ok(match outcome {
            DeleteOutcome::Deleted => Guarded::Applied(()),
            DeleteOutcome::Conflict { current } => Guarded::Conflict(codec::decode(current)?),
        })
    }

    /// Run a one-shot query.
    pub async fn list(&self, query: &Query) -> AppResult<Vec<HelpRequest>> {
        let docs = bounded(
            self.timeout,
            "query requests",
            self.store.query(REQUESTS, query),
        )
        .await?;
        codec::decode_all(docs)
    }

    /// Open a live query.
    pub async fn subscribe(&self, query: Query) -> AppResult<Subscription> {
        bounded(
            self.timeout,
            "subscribe requests",
            self.store.subscribe(REQUESTS, query),
        )
        .await
    }
}

fn not_found_as_request(err: AppError, id: RequestId) -> AppError {
    if err.is(resq_core::error::ErrorKind::NotFound) {
        AppError::not_found(format!("Request {id} not found"))
    } else {
        err
    }
}
