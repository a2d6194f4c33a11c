//! Best-effort delivery of lifecycle notifications.

use std::sync::Arc;

use tracing::{debug, warn};

use resq_core::config::NotificationsConfig;
use resq_core::events::DomainEvent;
use resq_store::bounded;

use super::rules::NotificationRules;
use super::service::NotificationService;

/// Creates the notifications a lifecycle event calls for.
///
/// Delivery never fails the transition that triggered it: each write is
/// bounded by the configured timeout, and failures are logged and dropped.
#[derive(Debug)]
pub struct NotificationDispatcher {
    /// Notification service for persistence
    notification_service: Arc<NotificationService>,
    /// Recipient and copy rules
    rules: NotificationRules,
    /// Configuration
    config: NotificationsConfig,
}

impl NotificationDispatcher {
    /// Create a new dispatcher
    pub fn new(notification_service: Arc<NotificationService>, config: NotificationsConfig) -> Self {
        Self {
            notification_service,
            rules: NotificationRules::new(),
            config,
        }
    }

    /// Deliver the notifications for `event`. Returns how many were stored.
    pub async fn dispatch(&self, event: &DomainEvent) -> usize {
        if !self.config.enabled {
            return 0;
        }

        let mut delivered = 0;
        for notification in self.rules.notifications_for(event) {
            let result = bounded(
                self.config.timeout(),
                "create notification",
                self.notification_service.create(&notification),
            )
            .await;
            match result {
                Ok(_) => delivered += 1,
                Err(e) => warn!(
                    event = event.payload.name(),
                    request_id = %event.payload.request_id(),
                    recipient = %notification.user_id,
                    error = %e,
                    "Failed to deliver notification"
                ),
            }
        }
        debug!(
            event = event.payload.name(),
            request_id = %event.payload.request_id(),
            delivered,
            "Dispatched notifications"
        );
        delivered
    }
}
