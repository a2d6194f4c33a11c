//! Principal profile repository.

use std::sync::Arc;
use std::time::Duration;

use resq_core::result::AppResult;
use resq_core::traits::DocumentStore;
use resq_core::types::filter::FilterField;
use resq_core::types::id::UserId;
use resq_core::types::query::Query;
use resq_core::types::sorting::SortField;
use resq_entity::user::model::fields;
use resq_entity::user::{NewPrincipal, Principal, UserRole};

use crate::{USERS, bounded, codec};

/// Repository for the `users` collection.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl std::fmt::Debug for UserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRepository").finish()
    }
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Store a profile under the auth provider's principal id.
    pub async fn insert(&self, id: UserId, profile: &NewPrincipal) -> AppResult<Principal> {
        let fields = codec::to_fields(profile)?;
        let doc = bounded(
            self.timeout,
            "insert user",
            self.store.insert(USERS, id.into_uuid(), fields),
        )
        .await?;
        codec::decode(doc)
    }

    /// Find a profile by principal id.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<Principal>> {
        let doc = bounded(
            self.timeout,
            "get user",
            self.store.get(USERS, id.into_uuid()),
        )
        .await?;
        doc.map(codec::decode).transpose()
    }

    /// Find a profile by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let wanted = email.trim().to_lowercase();
        let docs = bounded(
            self.timeout,
            "query users",
            self.store.query(USERS, &Query::new()),
        )
        .await?;
        let found = docs
            .into_iter()
            .find(|doc| {
                doc.field(fields::EMAIL)
                    .as_str()
                    .is_some_and(|e| e.to_lowercase() == wanted)
            })
            .map(codec::decode)
            .transpose()?;
        Ok(found)
    }

    /// List profiles with the given role, by display name.
    pub async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<Principal>> {
        let query = Query::new()
            .filter(FilterField::eq(fields::ROLE, role.as_str()))
            .order_by(SortField::asc(fields::DISPLAY_NAME));
        let docs = bounded(self.timeout, "query users", self.store.query(USERS, &query)).await?;
        codec::decode_all(docs)
    }
}
