//! Service wiring.

use std::sync::Arc;

use resq_auth::password::PasswordValidator;
use resq_core::config::AppConfig;
use resq_core::traits::{AuthProvider, DocumentStore};
use resq_store::{NotificationRepository, RequestRepository, UserRepository};

use crate::dashboard::DashboardService;
use crate::directory::DirectoryService;
use crate::notification::{NotificationDispatcher, NotificationService};
use crate::request::RequestService;
use crate::session::SessionService;

/// The shared services of one ResQ deployment.
#[derive(Debug, Clone)]
pub struct ResqApp {
    config: AppConfig,
    /// Profiles and roles.
    pub directory: Arc<DirectoryService>,
    /// Request lifecycle.
    pub requests: Arc<RequestService>,
    /// Notification storage and read tracking.
    pub notifications: Arc<NotificationService>,
    /// Lifecycle notification fan-out.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Per-role views.
    pub dashboards: Arc<DashboardService>,
}

impl ResqApp {
    /// Build every service over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let timeout = config.store.operation_timeout();
        let users = Arc::new(UserRepository::new(Arc::clone(&store), timeout));
        let requests = Arc::new(RequestRepository::new(Arc::clone(&store), timeout));
        let notifications = Arc::new(NotificationRepository::new(store, timeout));

        let directory = Arc::new(DirectoryService::new(users));
        let notification_service = Arc::new(NotificationService::new(notifications));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&notification_service),
            config.notifications.clone(),
        ));
        let request_service = Arc::new(RequestService::new(
            Arc::clone(&requests),
            Arc::clone(&directory),
            Arc::clone(&dispatcher),
        ));
        let dashboards = Arc::new(DashboardService::new(requests, Arc::clone(&directory)));

        Self {
            config,
            directory,
            requests: request_service,
            notifications: notification_service,
            dispatcher,
            dashboards,
        }
    }

    /// Open a client session over `auth`.
    pub fn session(&self, auth: Arc<dyn AuthProvider>) -> SessionService {
        SessionService::new(
            auth,
            Arc::clone(&self.directory),
            PasswordValidator::new(&self.config.auth),
            self.config.auth.timeout(),
        )
    }

    /// The configuration the services were built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
