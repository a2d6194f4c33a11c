//! Notification repository.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use resq_core::result::AppResult;
use resq_core::traits::{DocumentStore, Precondition, Subscription, WriteOutcome};
use resq_core::types::filter::FilterField;
use resq_core::types::id::{NotificationId, UserId};
use resq_core::types::query::Query;
use resq_core::types::sorting::SortField;
use resq_entity::notification::model::fields;
use resq_entity::notification::{NewNotification, Notification};

use super::Guarded;
use crate::codec::{self, Patch};
use crate::{NOTIFICATIONS, bounded};

/// Repository for the `notifications` collection.
#[derive(Clone)]
pub struct NotificationRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl std::fmt::Debug for NotificationRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationRepository").finish()
    }
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// A recipient's notifications, newest first.
    pub fn for_user(user_id: UserId) -> Query {
        Query::new()
            .filter(FilterField::eq(fields::USER_ID, user_id.to_string()))
            .order_by(SortField::desc(fields::CREATED_AT))
    }

    /// A recipient's unread notifications, newest first.
    pub fn unread_for_user(user_id: UserId) -> Query {
        Self::for_user(user_id).filter(FilterField::eq_bool(fields::READ, false))
    }

    /// Store a notification.
    pub async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let fields = codec::to_fields(notification)?;
        let doc = bounded(
            self.timeout,
            "create notification",
            self.store.create(NOTIFICATIONS, fields),
        )
        .await?;
        codec::decode(doc)
    }

    /// Find a notification by id.
    pub async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        let doc = bounded(
            self.timeout,
            "get notification",
            self.store.get(NOTIFICATIONS, id.into_uuid()),
        )
        .await?;
        doc.map(codec::decode).transpose()
    }

    /// Run a one-shot query.
    pub async fn list(&self, query: &Query) -> AppResult<Vec<Notification>> {
        let docs = bounded(
            self.timeout,
            "query notifications",
            self.store.query(NOTIFICATIONS, query),
        )
        .await?;
        codec::decode_all(docs)
    }

    /// Flip a notification to read, only if it is still unread.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> AppResult<Guarded<Notification>> {
        let patch = Patch::new()
            .set(fields::READ, true)
            .set_time(fields::READ_AT, at);
        let outcome = bounded(
            self.timeout,
            "update notification",
            self.store.update(
                NOTIFICATIONS,
                id.into_uuid(),
                patch.into_fields(),
                Some(Precondition::field_equals(fields::READ, false)),
            ),
        )
        .await?;
        Ok(match outcome {
            WriteOutcome::Applied(doc) => Guarded::Applied(codec::decode(doc)?),
            WriteOutcome::Conflict { current } => Guarded::Conflict(codec::decode(current)?),
        })
    }

    /// Open a live query.
    pub async fn subscribe(&self, query: Query) -> AppResult<Subscription> {
        bounded(
            self.timeout,
            "subscribe notifications",
            self.store.subscribe(NOTIFICATIONS, query),
        )
        .await
    }
}
