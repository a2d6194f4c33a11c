//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resq_core::types::id::{NotificationId, RequestId, UserId};

use super::kind::NotificationType;

/// Document field names used by queries and patches.
pub mod fields {
    /// Recipient.
    pub const USER_ID: &str = "user_id";
    /// Read flag.
    pub const READ: &str = "read";
    /// When the flag flipped.
    pub const READ_AT: &str = "read_at";
    /// Creation time.
    pub const CREATED_AT: &str = "created_at";
}

/// A message shown to one principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Store-assigned identifier.
    pub id: NotificationId,
    /// Store revision.
    #[serde(default)]
    pub version: u64,
    /// The recipient.
    pub user_id: UserId,
    /// What the notification is about.
    pub notification_type: NotificationType,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// The request involved, if any.
    #[serde(default)]
    pub request_id: Option<RequestId>,
    /// Additional structured data.
    #[serde(default)]
    pub context: serde_json::Value,
    /// Whether the recipient has read it. Only ever flips to `true`.
    #[serde(default)]
    pub read: bool,
    /// When the notification was created.
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
    /// When it was read.
    #[serde(default, with = "chrono::serde::ts_microseconds_option")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

/// Fields written when a notification is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient.
    pub user_id: UserId,
    /// What the notification is about.
    pub notification_type: NotificationType,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// The request involved, if any.
    pub request_id: Option<RequestId>,
    /// Additional structured data.
    pub context: serde_json::Value,
    /// Always `false` at creation.
    pub read: bool,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Build an unread notification stamped with the current time.
    pub fn new(
        user_id: UserId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            notification_type,
            title: title.into(),
            message: message.into(),
            request_id: None,
            context: serde_json::Value::Null,
            read: false,
            created_at: crate::time::now(),
        }
    }

    /// Attach the request this notification concerns.
    pub fn for_request(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Attach structured context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}
