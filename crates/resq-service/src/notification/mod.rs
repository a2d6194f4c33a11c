//! User notifications: who is told about which transition, storage, and
//! best-effort delivery.

pub mod dispatcher;
pub mod rules;
pub mod service;

pub use dispatcher::NotificationDispatcher;
pub use rules::NotificationRules;
pub use service::NotificationService;
