//! In-memory document store for tests, demos, and single-node runs.

pub mod feed;
pub mod store;

pub use feed::ChangeFeed;
pub use store::MemoryDocumentStore;
