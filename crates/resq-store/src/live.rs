//! Client-side view of a live query.
//!
//! Snapshots can arrive late or duplicated when several subscriptions feed
//! the same screen. A [`LiveView`] merges them by
//! document id, keeping whichever copy carries the higher revision, and
//! ignores whole snapshots older than one already applied. Views therefore
//! never regress to an earlier state.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use resq_core::result::AppResult;
use resq_core::traits::{Document, Snapshot};
use resq_core::types::query::Query;

use crate::codec;

/// Merged, ordered result set of one query.
#[derive(Debug, Clone)]
pub struct LiveView {
    query: Query,
    documents: HashMap<Uuid, Document>,
    last_sequence: Option<u64>,
}

impl LiveView {
    /// An empty view for `query`.
    pub fn new(query: Query) -> Self {
        Self {
            query,
            documents: HashMap::new(),
            last_sequence: None,
        }
    }

    /// Replace the result set with a snapshot.
    ///
    /// Snapshots older than the last one applied are ignored. Documents
    /// absent from the snapshot leave the view; for documents present in
    /// both, the higher revision wins. Returns whether the view changed.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        if self
            .last_sequence
            .is_some_and(|last| snapshot.sequence < last)
        {
            return false;
        }

        let mut next = HashMap::with_capacity(snapshot.documents.len());
        for doc in &snapshot.documents {
            let kept = match self.documents.get(&doc.id) {
                Some(existing) if existing.version > doc.version => existing.clone(),
                _ => doc.clone(),
            };
            next.insert(doc.id, kept);
        }

        self.last_sequence = Some(snapshot.sequence);
        let changed = next != self.documents;
        self.documents = next;
        changed
    }

    /// Number of documents in view.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in query order.
    pub fn documents(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.documents.values().cloned().collect();
        docs.sort_by(|a, b| {
            self.query
                .compare(&a.fields, &b.fields)
                .then(a.id.cmp(&b.id))
        });
        if let Some(limit) = self.query.limit {
            docs.truncate(limit);
        }
        docs
    }

    /// Decode the documents in query order.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<Vec<T>> {
        codec::decode_all(self.documents())
    }
}
