//! Per-client session management.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use resq_auth::gate::{self, AccessDecision, Route, SessionState};
use resq_auth::password::PasswordValidator;
use resq_core::error::{AppError, ErrorKind};
use resq_core::traits::AuthProvider;
use resq_core::types::id::UserId;
use resq_entity::time;
use resq_entity::user::{NewPrincipal, Principal, UserRole};
use resq_store::bounded;

use crate::context::ActorContext;
use crate::dashboard::LiveFeed;
use crate::directory::DirectoryService;

/// Raw input of the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Full name shown to other users.
    pub display_name: String,
    /// Sign-in email.
    pub email: String,
    /// Optional contact number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Chosen password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
    /// Role chosen at registration. Cannot be changed later.
    pub role: UserRole,
}

/// One client's authentication state.
///
/// Tracks [`SessionState`] as the auth provider signs principals in and
/// out, resolving each principal's profile before the session becomes
/// active. Live feeds bound to the session stop when it signs out.
pub struct SessionService {
    auth: Arc<dyn AuthProvider>,
    directory: Arc<DirectoryService>,
    validator: PasswordValidator,
    timeout: Duration,
    state: watch::Sender<SessionState>,
    token: Mutex<CancellationToken>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl SessionService {
    /// Creates a signed-out session over `auth`.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        directory: Arc<DirectoryService>,
        validator: PasswordValidator,
        timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            auth,
            directory,
            validator,
            timeout,
            state,
            token: Mutex::new(CancellationToken::new()),
        }
    }

    /// Creates an account and its profile, leaving the session active.
    pub async fn register(&self, form: RegisterRequest) -> Result<Principal, AppError> {
        let display_name = form.display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }
        self.validator.validate_email(&form.email)?;
        self.validator.validate(&form.password)?;
        self.validator
            .validate_confirmation(&form.password, &form.confirm_password)?;

        let email = form.email.trim().to_string();
        let user_id = bounded(
            self.timeout,
            "sign up",
            self.auth.sign_up(&email, &form.password),
        )
        .await?;
        self.state.send_replace(SessionState::Resolving(user_id));

        let profile = NewPrincipal {
            display_name: display_name.to_string(),
            email,
            phone: form
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            role: form.role,
            created_at: time::now(),
        };
        match self.directory.create_profile(user_id, &profile).await {
            Ok(principal) => Ok(self.activate(principal)),
            Err(e) => {
                self.roll_back(user_id).await;
                Err(e)
            }
        }
    }

    /// Signs in and resolves the principal's profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }
        let user_id = bounded(self.timeout, "sign in", self.auth.sign_in(email, password)).await?;
        self.resolve(user_id).await
    }

    /// Re-derives the session from the auth provider's current principal.
    pub async fn refresh(&self) -> Result<SessionState, AppError> {
        match self.auth.current_user() {
            None => {
                self.end();
                Ok(SessionState::SignedOut)
            }
            Some(user_id) => {
                self.resolve(user_id).await?;
                Ok(self.state())
            }
        }
    }

    /// Ends the session and stops every feed bound to it.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let result = bounded(self.timeout, "sign out", self.auth.sign_out()).await;
        self.end();
        result
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to session state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The acting principal, once the session is active.
    pub fn actor(&self) -> Result<ActorContext, AppError> {
        match &*self.state.borrow() {
            SessionState::Active(principal) => Ok(ActorContext::from(principal)),
            SessionState::Resolving(_) => {
                Err(AppError::authentication("Profile is still loading"))
            }
            SessionState::SignedOut => Err(AppError::authentication("Not signed in")),
        }
    }

    /// Gate decision for `route` in the current state.
    pub fn access(&self, route: Route) -> AccessDecision {
        gate::can_access(route, &self.state.borrow())
    }

    /// Gate decision for a raw path in the current state.
    pub fn access_path(&self, path: &str) -> AccessDecision {
        gate::can_access_path(path, &self.state.borrow())
    }

    /// Where to land after sign-in.
    pub fn home_route(&self) -> Route {
        self.state
            .borrow()
            .role()
            .map(Route::home_for)
            .unwrap_or(Route::Login)
    }

    /// Stop `feed` when this session signs out.
    pub fn bind<T>(&self, feed: &LiveFeed<T>)
    where
        T: serde::de::DeserializeOwned,
    {
        let session = self.current_token();
        let feed = feed.cancellation_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = session.cancelled() => feed.cancel(),
                _ = feed.cancelled() => {}
            }
        });
    }

    /// Look up the profile behind `user_id`.
    ///
    /// A missing profile signs the principal out. Any other failure keeps
    /// the session resolving, so the gate stays pending and [`refresh`]
    /// can try again.
    ///
    /// [`refresh`]: SessionService::refresh
    async fn resolve(&self, user_id: UserId) -> Result<Principal, AppError> {
        self.state.send_replace(SessionState::Resolving(user_id));
        match self.directory.resolve(user_id).await {
            Ok(principal) => Ok(self.activate(principal)),
            Err(e) if e.is(ErrorKind::NotFound) => {
                self.abandon(user_id).await;
                Err(AppError::authentication("No profile found for this account"))
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Profile lookup failed; session left resolving");
                Err(e)
            }
        }
    }

    fn activate(&self, principal: Principal) -> Principal {
        info!(user_id = %principal.id, role = %principal.role, "Session active");
        self.state
            .send_replace(SessionState::Active(principal.clone()));
        principal
    }

    /// Delete an account whose profile could not be stored, so the same
    /// email can register again.
    async fn roll_back(&self, user_id: UserId) {
        match bounded(self.timeout, "delete account", self.auth.delete_account()).await {
            Ok(()) => info!(user_id = %user_id, "Rolled back incomplete registration"),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to roll back incomplete registration");
                self.abandon(user_id).await;
                return;
            }
        }
        self.end();
    }

    /// Sign out after the profile could not be resolved.
    async fn abandon(&self, user_id: UserId) {
        if let Err(e) = bounded(self.timeout, "sign out", self.auth.sign_out()).await {
            warn!(user_id = %user_id, error = %e, "Failed to sign out unresolved session");
        }
        self.end();
    }

    fn end(&self) {
        let mut token = self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        token.cancel();
        *token = CancellationToken::new();
        self.state.send_replace(SessionState::SignedOut);
    }

    fn current_token(&self) -> CancellationToken {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resq_auth::provider::{AccountRegistry, MemoryAuthProvider};
    use resq_core::config::AppConfig;
    use resq_store::MemoryDocumentStore;

    use crate::app::ResqApp;

    fn app() -> (ResqApp, MemoryAuthProvider) {
        let mut config = AppConfig::default();
        config.auth.argon2_memory_kib = 64;
        config.auth.argon2_iterations = 1;
        let store = MemoryDocumentStore::new(&config.store);
        let registry = Arc::new(AccountRegistry::new(&config.auth).unwrap());
        (ResqApp::new(config, Arc::new(store)), MemoryAuthProvider::new(registry))
    }

    fn form(role: UserRole) -> RegisterRequest {
        RegisterRequest {
            display_name: "Carla Diaz".into(),
            email: "carla@example.org".into(),
            phone: Some("  ".into()),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_activates_session() {
        let (app, auth) = app();
        let session = app.session(Arc::new(auth));
        let principal = session.register(form(UserRole::Citizen)).await.unwrap();
        assert_eq!(principal.phone, None);
        assert_eq!(session.state().role(), Some(UserRole::Citizen));
        assert_eq!(session.home_route(), Route::CitizenDashboard);
        assert_eq!(session.access(Route::RequestHelp), AccessDecision::Allow);
        assert_eq!(
            session.access(Route::AdminDashboard),
            AccessDecision::RedirectToHome
        );
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_confirmation() {
        let (app, auth) = app();
        let session = app.session(Arc::new(auth));
        let mut bad = form(UserRole::Volunteer);
        bad.confirm_password = "secret2".into();
        let err = session.register(bad).await.unwrap_err();
        assert_eq!(err.message, "Passwords do not match");
        assert_eq!(session.state(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_in_from_another_client() {
        let (app, auth) = app();
        let other = auth.new_session();
        app.session(Arc::new(auth))
            .register(form(UserRole::Volunteer))
            .await
            .unwrap();

        let session = app.session(Arc::new(other));
        assert_eq!(
            session.access(Route::VolunteerTasks),
            AccessDecision::RedirectToLogin
        );
        let principal = session.sign_in("carla@example.org", "secret1").await.unwrap();
        assert_eq!(principal.role, UserRole::Volunteer);
        assert_eq!(session.actor().unwrap().user_id, principal.id);
    }

    #[tokio::test]
    async fn test_account_without_profile_is_signed_out() {
        let (app, auth) = app();
        auth.sign_up("ghost@example.org", "secret1").await.unwrap();
        let session = app.session(Arc::new(auth.new_session()));
        let err = session
            .sign_in("ghost@example.org", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(session.state(), SessionState::SignedOut);
        assert!(session.actor().is_err());
    }

    fn app_with_store() -> (ResqApp, MemoryAuthProvider, MemoryDocumentStore) {
        let mut config = AppConfig::default();
        config.auth.argon2_memory_kib = 64;
        config.auth.argon2_iterations = 1;
        let store = MemoryDocumentStore::new(&config.store);
        let registry = Arc::new(AccountRegistry::new(&config.auth).unwrap());
        (
            ResqApp::new(config, Arc::new(store.clone())),
            MemoryAuthProvider::new(registry),
            store,
        )
    }

    #[tokio::test]
    async fn test_register_retry_after_store_outage() {
        let (app, auth, store) = app_with_store();
        store.set_offline(true);
        let session = app.session(Arc::new(auth.new_session()));
        let err = session.register(form(UserRole::Citizen)).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(session.state(), SessionState::SignedOut);
        assert!(auth.registry().is_empty());

        store.set_offline(false);
        let principal = session.register(form(UserRole::Citizen)).await.unwrap();
        assert_eq!(principal.email, "carla@example.org");

        let other = app.session(Arc::new(auth.new_session()));
        let signed_in = other.sign_in("carla@example.org", "secret1").await.unwrap();
        assert_eq!(signed_in.id, principal.id);
    }

    #[tokio::test]
    async fn test_sign_in_during_store_outage_stays_pending() {
        let (app, auth, store) = app_with_store();
        app.session(Arc::new(auth.new_session()))
            .register(form(UserRole::Volunteer))
            .await
            .unwrap();

        let provider = Arc::new(auth.new_session());
        let session = app.session(Arc::clone(&provider) as Arc<dyn AuthProvider>);
        store.set_offline(true);
        let err = session
            .sign_in("carla@example.org", "secret1")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(session.state(), SessionState::Resolving(_)));
        assert_eq!(session.access(Route::VolunteerTasks), AccessDecision::Pending);
        assert!(provider.current_user().is_some());

        store.set_offline(false);
        let state = session.refresh().await.unwrap();
        assert_eq!(state.role(), Some(UserRole::Volunteer));
        assert_eq!(session.access(Route::VolunteerTasks), AccessDecision::Allow);
    }

    #[tokio::test]
    async fn test_sign_out_stops_bound_feeds() {
        let (app, auth) = app();
        let session = app.session(Arc::new(auth));
        session.register(form(UserRole::Citizen)).await.unwrap();
        let ctx = session.actor().unwrap();

        let feed = app.dashboards.my_requests(&ctx).await.unwrap();
        session.bind(&feed);
        let token = feed.cancellation_token();

        session.sign_out().await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .unwrap();
        assert_eq!(session.access(Route::CitizenDashboard), AccessDecision::RedirectToLogin);
    }
}
