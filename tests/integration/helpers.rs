//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use resq_auth::{AccountRegistry, MemoryAuthProvider};
use resq_core::config::AppConfig;
use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::{
    DeleteOutcome, Document, DocumentStore, Fields, Precondition, Subscription, WriteOutcome,
};
use resq_core::types::query::Query;
use resq_entity::request::HelpRequest;
use resq_entity::user::UserRole;
use resq_service::{ActorContext, CreateRequest, RegisterRequest, ResqApp, SessionService};
use resq_store::MemoryDocumentStore;

/// Password used for every test account.
pub const PASSWORD: &str = "relief-2024";

/// Test application context
pub struct TestApp {
    /// The wired services
    pub app: ResqApp,
    /// Backing store, for latency and outage injection
    pub store: Arc<MemoryDocumentStore>,
    /// Accounts shared by every session
    pub registry: Arc<AccountRegistry>,
}

/// A signed-in client.
pub struct Client {
    /// The client's session
    pub session: SessionService,
    /// The signed-in principal
    pub ctx: ActorContext,
}

/// Configuration with cheap password hashing.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.argon2_memory_kib = 64;
    config.auth.argon2_iterations = 1;
    config
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryDocumentStore::new(&config.store));
        Self::with_store(config, Arc::clone(&store) as Arc<dyn DocumentStore>, store)
    }

    /// Create a test application whose services see `backend`, which
    /// wraps `store`.
    pub fn with_store(
        config: AppConfig,
        backend: Arc<dyn DocumentStore>,
        store: Arc<MemoryDocumentStore>,
    ) -> Self {
        let registry =
            Arc::new(AccountRegistry::new(&config.auth).expect("Failed to build registry"));
        Self {
            app: ResqApp::new(config, backend),
            store,
            registry,
        }
    }

    /// A fresh signed-out client
    pub fn session(&self) -> SessionService {
        self.app
            .session(Arc::new(MemoryAuthProvider::new(Arc::clone(&self.registry))))
    }

    /// Register a new account and return its signed-in client
    pub async fn register(&self, name: &str, role: UserRole) -> Client {
        let session = self.session();
        session
            .register(registration(name, role))
            .await
            .expect("Failed to register test user");
        let ctx = session.actor().expect("Session not active after register");
        Client { session, ctx }
    }

    /// Register a citizen
    pub async fn citizen(&self, name: &str) -> Client {
        self.register(name, UserRole::Citizen).await
    }

    /// Register a volunteer
    pub async fn volunteer(&self, name: &str) -> Client {
        self.register(name, UserRole::Volunteer).await
    }

    /// Register an admin
    pub async fn admin(&self, name: &str) -> Client {
        self.register(name, UserRole::Admin).await
    }

    /// Submit a request as `citizen`
    pub async fn submit(&self, citizen: &ActorContext, request_type: &str, priority: &str) -> HelpRequest {
        self.app
            .requests
            .create(citizen, request_form(request_type, priority))
            .await
            .expect("Failed to submit request")
    }
}

/// Registration form for `name`.
pub fn registration(name: &str, role: UserRole) -> RegisterRequest {
    RegisterRequest {
        display_name: name.to_string(),
        email: email_for(name),
        phone: None,
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
        role,
    }
}

/// Email address used for `name`.
pub fn email_for(name: &str) -> String {
    format!("{}@resq.test", name.to_lowercase().replace(' ', "."))
}

/// Request-help form with fixed description and location.
pub fn request_form(request_type: &str, priority: &str) -> CreateRequest {
    CreateRequest {
        request_type: request_type.to_string(),
        description: "Insulin needed".to_string(),
        location: "12 Elm St".to_string(),
        priority: priority.to_string(),
    }
}

/// Store wrapper whose writes to one collection always fail.
pub struct FailingCollection {
    inner: Arc<MemoryDocumentStore>,
    collection: &'static str,
}

impl FailingCollection {
    /// Fail every write to `collection`.
    pub fn new(inner: Arc<MemoryDocumentStore>, collection: &'static str) -> Self {
        Self { inner, collection }
    }

    fn check(&self, collection: &str) -> AppResult<()> {
        if collection == self.collection {
            Err(AppError::external(format!("{collection} is unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for FailingCollection {
    async fn create(&self, collection: &str, fields: Fields) -> AppResult<Document> {
        self.check(collection)?;
        self.inner.create(collection, fields).await
    }

    async fn insert(&self, collection: &str, id: Uuid, fields: Fields) -> AppResult<Document> {
        self.check(collection)?;
        self.inner.insert(collection, id, fields).await
    }

    async fn get(&self, collection: &str, id: Uuid) -> AppResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Fields,
        precondition: Option<Precondition>,
    ) -> AppResult<WriteOutcome> {
        self.check(collection)?;
        self.inner.update(collection, id, patch, precondition).await
    }

    async fn delete(
        &self,
        collection: &str,
        id: Uuid,
        precondition: Option<Precondition>,
    ) -> AppResult<DeleteOutcome> {
        self.check(collection)?;
        self.inner.delete(collection, id, precondition).await
    }

    async fn query(&self, collection: &str, query: &Query) -> AppResult<Vec<Document>> {
        self.inner.query(collection, query).await
    }

    async fn subscribe(&self, collection: &str, query: Query) -> AppResult<Subscription> {
        self.inner.subscribe(collection, query).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
