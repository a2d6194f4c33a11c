//! # resq-service
//!
//! Business logic service layer for ResQ. Each service orchestrates the
//! typed repositories, the auth provider, and the RBAC enforcer to
//! implement one part of the help-request workflow.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`ResqApp`] wires the
//! shared services together; each client session gets its own
//! [`SessionService`].

pub mod app;
pub mod context;
pub mod dashboard;
pub mod directory;
pub mod notification;
pub mod request;
pub mod session;

pub use app::ResqApp;
pub use context::ActorContext;
pub use dashboard::{DashboardService, DashboardStats, LiveFeed};
pub use directory::DirectoryService;
pub use notification::{NotificationDispatcher, NotificationRules, NotificationService};
pub use request::{CreateRequest, RequestService};
pub use session::{RegisterRequest, SessionService};
