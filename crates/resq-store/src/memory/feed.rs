//! Per-collection change notifications.

use dashmap::DashMap;
use tokio::sync::broadcast;

/// Broadcasts the store sequence number of every committed write, keyed
/// by collection.
#[derive(Debug)]
pub struct ChangeFeed {
    /// Collection name → broadcast sender
    channels: DashMap<String, broadcast::Sender<u64>>,
    /// Buffer size for channels
    buffer_size: usize,
}

impl ChangeFeed {
    /// Create a new change feed.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Announce a committed write. No-op if nobody is listening.
    ///
    /// Never awaits, so it can run under the store's write guard and a
    /// cancelled writer cannot commit without announcing.
    pub fn publish(&self, collection: &str, sequence: u64) {
        if let Some(tx) = self.channels.get(collection) {
            let _ = tx.send(sequence);
        }
    }

    /// Listen for writes to a collection.
    pub fn subscribe(&self, collection: &str) -> broadcast::Receiver<u64> {
        self.channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }
}
