//! Document store trait: the hosted database consumed by ResQ.
//!
//! Collections are flat mappings from a store-generated id to a JSON
//! object. Every write bumps the document's revision. Mutations may carry
//! a [`Precondition`] that the store checks and applies atomically, which
//! is how concurrent lifecycle transitions are arbitrated.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::query::Query;

/// The field map of a stored document.
pub type Fields = Map<String, Value>;

/// A stored document with its store-assigned identity and revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Revision, starting at 1 and incremented by every write.
    pub version: u64,
    /// Document contents.
    pub fields: Fields,
}

impl Document {
    /// Read a field, treating absence as `null`.
    pub fn field(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&Value::Null)
    }
}

/// A condition the stored document must satisfy for a write to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Precondition {
    /// The named field currently holds exactly this value.
    FieldEquals {
        /// Field name.
        field: String,
        /// Expected value (`null` matches an absent field).
        value: Value,
    },
    /// The document is still at this revision.
    Version {
        /// Expected revision.
        version: u64,
    },
    /// Every nested condition holds.
    All {
        /// Conditions to conjoin.
        conditions: Vec<Precondition>,
    },
}

impl Precondition {
    /// Shorthand for [`Precondition::FieldEquals`].
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Shorthand for [`Precondition::Version`].
    pub fn version(version: u64) -> Self {
        Self::Version { version }
    }

    /// Conjoin this condition with another.
    pub fn and(self, other: Precondition) -> Self {
        match self {
            Self::All { mut conditions } => {
                conditions.push(other);
                Self::All { conditions }
            }
            first => Self::All {
                conditions: vec![first, other],
            },
        }
    }

    /// Evaluate against the current stored document.
    pub fn holds(&self, doc: &Document) -> bool {
        match self {
            Self::FieldEquals { field, value } => doc.field(field) == value,
            Self::Version { version } => doc.version == *version,
            Self::All { conditions } => conditions.iter().all(|c| c.holds(doc)),
        }
    }
}

/// Result of a conditional update.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The patch was applied; carries the document as written.
    Applied(Document),
    /// The precondition failed; nothing was written.
    Conflict {
        /// The document as currently stored.
        current: Document,
    },
}

/// Result of a conditional delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The document was removed.
    Deleted,
    /// The precondition failed; the document persists.
    Conflict {
        /// The document as currently stored.
        current: Document,
    },
}

/// The full result set of a subscribed query at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Store-wide change sequence this snapshot reflects.
    pub sequence: u64,
    /// Matching documents in query order.
    pub documents: Vec<Document>,
}

/// A live, cancellable stream of [`Snapshot`]s.
///
/// The first snapshot is the current result set; later ones follow each
/// change to the collection. Dropping the subscription cancels it.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<Snapshot>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Wrap a snapshot receiver and the token that stops its producer.
    pub fn new(rx: mpsc::Receiver<Snapshot>, cancel: CancellationToken) -> Self {
        Self { rx, cancel }
    }

    /// Wait for the next snapshot. Returns `None` once cancelled.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            snapshot = self.rx.recv() => snapshot,
            _ = self.cancel.cancelled() => None,
        }
    }

    /// Return a snapshot if one is already buffered.
    pub fn try_next(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    /// Stop delivery.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether delivery has been stopped.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that cancels this subscription, for wiring to session teardown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Stream for Subscription {
    type Item = Snapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Snapshot>> {
        let this = self.get_mut();
        if this.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

/// The hosted document database.
///
/// Implementations must apply each write, including its precondition
/// check, atomically with respect to other writes on the same document.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Create a document with a store-generated id.
    async fn create(&self, collection: &str, fields: Fields) -> AppResult<Document>;

    /// Create a document under a caller-chosen id. Conflicts if it exists.
    async fn insert(&self, collection: &str, id: Uuid, fields: Fields) -> AppResult<Document>;

    /// Fetch a document by id.
    async fn get(&self, collection: &str, id: Uuid) -> AppResult<Option<Document>>;

    /// Merge `patch` into a document if `precondition` holds.
    ///
    /// A `null` value in the patch removes the field. Fails with
    /// `NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Fields,
        precondition: Option<Precondition>,
    ) -> AppResult<WriteOutcome>;

    /// Remove a document if `precondition` holds.
    async fn delete(
        &self,
        collection: &str,
        id: Uuid,
        precondition: Option<Precondition>,
    ) -> AppResult<DeleteOutcome>;

    /// Run a one-shot query.
    async fn query(&self, collection: &str, query: &Query) -> AppResult<Vec<Document>>;

    /// Subscribe to a live query.
    async fn subscribe(&self, collection: &str, query: Query) -> AppResult<Subscription>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
