//! [`DocumentStore`] backed by process memory.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use uuid::Uuid;

use resq_core::config::StoreConfig;
use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::{
    DeleteOutcome, Document, DocumentStore, Fields, Precondition, Snapshot, Subscription,
    WriteOutcome,
};
use resq_core::types::query::Query;

use super::feed::ChangeFeed;

type Collection = HashMap<Uuid, Document>;

#[derive(Debug)]
struct Inner {
    /// Collection name → documents. One lock makes every write, including
    /// its precondition check, atomic.
    collections: RwLock<HashMap<String, Collection>>,
    /// Store-wide write counter; bumped under the write lock.
    sequence: AtomicU64,
    changes: ChangeFeed,
    subscription_buffer: usize,
    /// Simulated outage: every call fails with an external-service error.
    offline: AtomicBool,
    /// Simulated round-trip latency in milliseconds.
    latency_ms: AtomicU64,
}

/// In-memory document store with atomic conditional writes and live
/// query subscriptions.
///
/// Cloning is cheap and every clone shares the same data, so one store
/// can back several simulated clients.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                sequence: AtomicU64::new(0),
                changes: ChangeFeed::new(config.subscription_buffer),
                subscription_buffer: config.subscription_buffer.max(1),
                offline: AtomicBool::new(false),
                latency_ms: AtomicU64::new(0),
            }),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.inner
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    async fn round_trip(&self) -> AppResult<()> {
        let latency = self.inner.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(AppError::external("Document store is unreachable"));
        }
        Ok(())
    }
}

impl Inner {
    /// Bump the write counter and announce it. Call with the write guard held.
    fn commit(&self, collection: &str) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.changes.publish(collection, sequence);
        sequence
    }

    async fn snapshot(&self, collection: &str, query: &Query) -> Snapshot {
        let collections = self.collections.read().await;
        let sequence = self.sequence.load(Ordering::SeqCst);
        let documents = collections
            .get(collection)
            .map(|docs| evaluate(docs, query))
            .unwrap_or_default();
        Snapshot {
            sequence,
            documents,
        }
    }
}

/// Run a query against one collection.
fn evaluate(docs: &Collection, query: &Query) -> Vec<Document> {
    let mut matched: Vec<Document> = docs
        .values()
        .filter(|doc| query.matches(&doc.fields))
        .cloned()
        .collect();
    matched.sort_by(|a, b| query.compare(&a.fields, &b.fields).then(a.id.cmp(&b.id)));
    if let Some(limit) = query.limit {
        matched.truncate(limit);
    }
    matched
}

fn merge(fields: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        if value.is_null() {
            fields.remove(&key);
        } else {
            fields.insert(key, value);
        }
    }
}

fn strip_nulls(fields: Fields) -> Fields {
    fields.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: &str, fields: Fields) -> AppResult<Document> {
        self.insert(collection, Uuid::new_v4(), fields).await
    }

    async fn insert(&self, collection: &str, id: Uuid, fields: Fields) -> AppResult<Document> {
        self.round_trip().await?;
        let (doc, sequence) = {
            let mut collections = self.inner.collections.write().await;
            let docs = collections.entry(collection.to_string()).or_default();
            if docs.contains_key(&id) {
                return Err(AppError::conflict(format!(
                    "Document {id} already exists in {collection}"
                )));
            }
            let doc = Document {
                id,
                version: 1,
                fields: strip_nulls(fields),
            };
            docs.insert(id, doc.clone());
            (doc, self.inner.commit(collection))
        };
        trace!(collection, %id, sequence, "Document created");
        Ok(doc)
    }

    async fn get(&self, collection: &str, id: Uuid) -> AppResult<Option<Document>> {
        self.round_trip().await?;
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Fields,
        precondition: Option<Precondition>,
    ) -> AppResult<WriteOutcome> {
        self.round_trip().await?;
        let (doc, sequence) = {
            let mut collections = self.inner.collections.write().await;
            let Some(doc) = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(&id))
            else {
                return Err(AppError::not_found(format!(
                    "Document {id} not found in {collection}"
                )));
            };
            if let Some(condition) = &precondition {
                if !condition.holds(doc) {
                    debug!(collection, %id, version = doc.version, "Update precondition failed");
                    return Ok(WriteOutcome::Conflict {
                        current: doc.clone(),
                    });
                }
            }
            merge(&mut doc.fields, patch);
            doc.version += 1;
            (doc.clone(), self.inner.commit(collection))
        };
        trace!(collection, %id, version = doc.version, sequence, "Document updated");
        Ok(WriteOutcome::Applied(doc))
    }

    async fn delete(
        &self,
        collection: &str,
        id: Uuid,
        precondition: Option<Precondition>,
    ) -> AppResult<DeleteOutcome> {
        self.round_trip().await?;
        let sequence = {
            let mut collections = self.inner.collections.write().await;
            let Some(docs) = collections.get_mut(collection) else {
                return Err(AppError::not_found(format!(
                    "Document {id} not found in {collection}"
                )));
            };
            let Some(doc) = docs.get(&id) else {
                return Err(AppError::not_found(format!(
                    "Document {id} not found in {collection}"
                )));
            };
            if let Some(condition) = &precondition {
                if !condition.holds(doc) {
                    debug!(collection, %id, version = doc.version, "Delete precondition failed");
                    return Ok(DeleteOutcome::Conflict {
                        current: doc.clone(),
                    });
                }
            }
            docs.remove(&id);
            self.inner.commit(collection)
        };
        trace!(collection, %id, sequence, "Document deleted");
        Ok(DeleteOutcome::Deleted)
    }

    async fn query(&self, collection: &str, query: &Query) -> AppResult<Vec<Document>> {
        self.round_trip().await?;
        Ok(self.inner.snapshot(collection, query).await.documents)
    }

    async fn subscribe(&self, collection: &str, query: Query) -> AppResult<Subscription> {
        self.round_trip().await?;

        // Listen before taking the initial snapshot so no write slips between.
        let mut changes = self.inner.changes.subscribe(collection);
        let (tx, rx) = mpsc::channel(self.inner.subscription_buffer);
        let cancel = CancellationToken::new();

        let initial = self.inner.snapshot(collection, &query).await;
        let mut last = initial.documents.clone();
        tx.try_send(initial)
            .map_err(|_| AppError::internal("Subscription buffer rejected initial snapshot"))?;

        let inner = Arc::clone(&self.inner);
        let token = cancel.clone();
        let collection = collection.to_string();
        tokio::spawn(async move {
            loop {
                let change = tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tx.closed() => break,
                    change = changes.recv() => change,
                };
                match change {
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
                let snapshot = inner.snapshot(&collection, &query).await;
                if snapshot.documents == last {
                    continue;
                }
                last = snapshot.documents.clone();
                tokio::select! {
                    _ = token.cancelled() => break,
                    sent = tx.send(snapshot) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(collection = %collection, "Subscription closed");
        });

        Ok(Subscription::new(rx, cancel))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.inner.offline.load(Ordering::SeqCst))
    }
}
