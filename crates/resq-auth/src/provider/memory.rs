//! In-memory email/password authentication.
//!
//! An [`AccountRegistry`] plays the hosted identity service: it holds
//! every account and is shared by all clients. Each [`MemoryAuthProvider`]
//! is one client session on top of it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tracing::{debug, info};

use resq_core::config::AuthConfig;
use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::AuthProvider;
use resq_core::types::id::UserId;

use crate::password::PasswordHasher;

#[derive(Debug)]
struct Account {
    principal_id: UserId,
    password_hash: String,
}

/// Shared account table.
#[derive(Debug)]
pub struct AccountRegistry {
    /// Lowercased email → account
    accounts: DashMap<String, Account>,
    hasher: PasswordHasher,
    offline: AtomicBool,
}

impl AccountRegistry {
    /// Create an empty registry.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        Ok(Self {
            accounts: DashMap::new(),
            hasher: PasswordHasher::new(config)?,
            offline: AtomicBool::new(false),
        })
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no accounts exist.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn ensure_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::external("Authentication service is unreachable"));
        }
        Ok(())
    }

    fn register(&self, email: &str, password: &str) -> AppResult<UserId> {
        self.ensure_online()?;
        let key = email.trim().to_lowercase();
        let password_hash = self.hasher.hash_password(password)?;
        match self.accounts.entry(key) {
            Entry::Occupied(_) => Err(AppError::validation(
                "An account with this email already exists",
            )),
            Entry::Vacant(slot) => {
                let principal_id = UserId::new();
                slot.insert(Account {
                    principal_id,
                    password_hash,
                });
                Ok(principal_id)
            }
        }
    }

    fn remove(&self, principal_id: UserId) -> AppResult<()> {
        self.ensure_online()?;
        self.accounts
            .retain(|_, account| account.principal_id != principal_id);
        Ok(())
    }

    fn verify(&self, email: &str, password: &str) -> AppResult<UserId> {
        self.ensure_online()?;
        let key = email.trim().to_lowercase();
        let (principal_id, password_hash) = match self.accounts.get(&key) {
            Some(account) => (account.principal_id, account.password_hash.clone()),
            None => return Err(AppError::authentication("Invalid email or password")),
        };
        if self.hasher.verify_password(password, &password_hash)? {
            Ok(principal_id)
        } else {
            Err(AppError::authentication("Invalid email or password"))
        }
    }
}

/// One client session against a shared [`AccountRegistry`].
#[derive(Debug)]
pub struct MemoryAuthProvider {
    registry: Arc<AccountRegistry>,
    session: watch::Sender<Option<UserId>>,
}

impl MemoryAuthProvider {
    /// Open a signed-out session on `registry`.
    pub fn new(registry: Arc<AccountRegistry>) -> Self {
        let (session, _) = watch::channel(None);
        Self { registry, session }
    }

    /// Open another signed-out session on the same accounts.
    pub fn new_session(&self) -> Self {
        Self::new(Arc::clone(&self.registry))
    }

    /// The shared account table.
    pub fn registry(&self) -> &Arc<AccountRegistry> {
        &self.registry
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<UserId> {
        let principal_id = self.registry.verify(email, password)?;
        self.session.send_replace(Some(principal_id));
        info!(principal_id = %principal_id, "Signed in");
        Ok(principal_id)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<UserId> {
        let principal_id = self.registry.register(email, password)?;
        self.session.send_replace(Some(principal_id));
        info!(principal_id = %principal_id, "Account created");
        Ok(principal_id)
    }

    async fn sign_out(&self) -> AppResult<()> {
        if let Some(previous) = self.session.send_replace(None) {
            debug!(principal_id = %previous, "Signed out");
        }
        Ok(())
    }

    async fn delete_account(&self) -> AppResult<()> {
        let Some(principal_id) = self.current_user() else {
            return Err(AppError::authentication("Not signed in"));
        };
        self.registry.remove(principal_id)?;
        self.session.send_replace(None);
        info!(principal_id = %principal_id, "Account deleted");
        Ok(())
    }

    fn current_user(&self) -> Option<UserId> {
        *self.session.borrow()
    }

    fn session(&self) -> watch::Receiver<Option<UserId>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resq_core::error::ErrorKind;

    fn provider() -> MemoryAuthProvider {
        let config = AuthConfig {
            argon2_memory_kib: 64,
            argon2_iterations: 1,
            ..AuthConfig::default()
        };
        MemoryAuthProvider::new(Arc::new(AccountRegistry::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let auth = provider();
        let mut session = auth.session();
        let id = auth.sign_up("ana@example.org", "secret1").await.unwrap();
        assert_eq!(auth.current_user(), Some(id));
        assert!(session.has_changed().unwrap());
        assert_eq!(*session.borrow_and_update(), Some(id));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let auth = provider();
        auth.sign_up("ana@example.org", "secret1").await.unwrap();
        let err = auth
            .new_session()
            .sign_up("ANA@example.org", "secret2")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let first = provider();
        let second = first.new_session();
        let id = first.sign_up("ana@example.org", "secret1").await.unwrap();
        assert_eq!(second.current_user(), None);
        assert_eq!(second.sign_in("ana@example.org", "secret1").await.unwrap(), id);
        first.sign_out().await.unwrap();
        assert_eq!(first.current_user(), None);
        assert_eq!(second.current_user(), Some(id));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let auth = provider();
        auth.sign_up("ana@example.org", "secret1").await.unwrap();
        let err = auth
            .sign_in("ana@example.org", "secret2")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_deleted_account_frees_the_email() {
        let auth = provider();
        auth.sign_up("ana@example.org", "secret1").await.unwrap();
        auth.delete_account().await.unwrap();
        assert_eq!(auth.current_user(), None);
        assert!(auth.registry().is_empty());

        let err = auth.sign_in("ana@example.org", "secret1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        auth.sign_up("ana@example.org", "secret2").await.unwrap();
        assert_eq!(auth.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_account_requires_session() {
        let err = provider().delete_account().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_offline_registry() {
        let auth = provider();
        auth.registry().set_offline(true);
        let err = auth.sign_in("ana@example.org", "x").await.unwrap_err();
        assert!(err.is_retryable());
    }
}
