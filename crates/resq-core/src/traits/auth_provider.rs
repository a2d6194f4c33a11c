//! Authentication provider trait.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Email/password authentication as offered by the hosted platform.
///
/// One provider instance represents one client session: `sign_in` and
/// `sign_up` change the session's current principal and every
/// [`session`](AuthProvider::session) receiver observes the change.
#[async_trait]
pub trait AuthProvider: Send + Sync + 'static {
    /// Sign in with existing credentials and return the principal id.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<UserId>;

    /// Create an account, sign it in, and return the new principal id.
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<UserId>;

    /// End the current session.
    async fn sign_out(&self) -> AppResult<()>;

    /// Delete the signed-in account and end the session.
    ///
    /// Used to roll back a registration whose profile could not be stored,
    /// so the email can be registered again.
    async fn delete_account(&self) -> AppResult<()>;

    /// The currently signed-in principal, if any.
    fn current_user(&self) -> Option<UserId>;

    /// Subscribe to session changes. Yields `None` when signed out.
    fn session(&self) -> watch::Receiver<Option<UserId>>;
}
