//! Notification creation, listing, and read tracking.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use resq_core::error::AppError;
use resq_core::types::id::{NotificationId, UserId};
use resq_entity::notification::{NewNotification, Notification, NotificationType};
use resq_entity::time;
use resq_store::{Guarded, NotificationRepository};

use crate::context::ActorContext;
use crate::dashboard::LiveFeed;

/// Manages user notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notif_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notif_repo: Arc<NotificationRepository>) -> Self {
        Self { notif_repo }
    }

    /// Creates a notification for `user_id`.
    pub async fn notify(
        &self,
        user_id: UserId,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        context: Value,
    ) -> Result<NotificationId, AppError> {
        let notification =
            NewNotification::new(user_id, notification_type, title, message).with_context(context);
        Ok(self.create(&notification).await?.id)
    }

    /// Stores a prepared notification.
    pub async fn create(&self, notification: &NewNotification) -> Result<Notification, AppError> {
        let created = self.notif_repo.create(notification).await?;
        debug!(
            notification_id = %created.id,
            user_id = %created.user_id,
            kind = %created.notification_type,
            "Notification created"
        );
        Ok(created)
    }

    /// Lists the actor's notifications, newest first.
    pub async fn list(&self, ctx: &ActorContext) -> Result<Vec<Notification>, AppError> {
        self.notif_repo
            .list(&NotificationRepository::for_user(ctx.user_id))
            .await
    }

    /// Counts the actor's unread notifications.
    pub async fn unread_count(&self, ctx: &ActorContext) -> Result<usize, AppError> {
        Ok(self
            .notif_repo
            .list(&NotificationRepository::unread_for_user(ctx.user_id))
            .await?
            .len())
    }

    /// Marks one of the actor's notifications as read.
    ///
    /// Read is one-way: marking an already-read notification leaves its
    /// `read_at` untouched.
    pub async fn mark_read(
        &self,
        ctx: &ActorContext,
        notification_id: NotificationId,
    ) -> Result<Notification, AppError> {
        let existing = self
            .notif_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {notification_id} not found")))?;
        if existing.user_id != ctx.user_id {
            return Err(AppError::authorization(
                "Cannot mark another user's notification as read",
            ));
        }
        if !existing.is_unread() {
            return Ok(existing);
        }

        match self.notif_repo.mark_read(notification_id, time::now()).await? {
            Guarded::Applied(updated) => Ok(updated),
            Guarded::Conflict(current) => Ok(current),
        }
    }

    /// Marks every unread notification of the actor as read.
    ///
    /// Returns how many notifications this call flipped.
    pub async fn mark_all_read(&self, ctx: &ActorContext) -> Result<u64, AppError> {
        let unread = self
            .notif_repo
            .list(&NotificationRepository::unread_for_user(ctx.user_id))
            .await?;
        let at = time::now();
        let mut flipped = 0u64;
        for notification in unread {
            if self.notif_repo.mark_read(notification.id, at).await?.is_applied() {
                flipped += 1;
            }
        }
        info!(user_id = %ctx.user_id, count = flipped, "Marked notifications read");
        Ok(flipped)
    }

    /// Opens a live feed of the actor's notifications.
    pub async fn subscribe(&self, ctx: &ActorContext) -> Result<LiveFeed<Notification>, AppError> {
        let query = NotificationRepository::for_user(ctx.user_id);
        let subscription = self.notif_repo.subscribe(query.clone()).await?;
        LiveFeed::open(query, subscription).await
    }
}
