//! Authentication provider implementations.

pub mod memory;

pub use memory::{AccountRegistry, MemoryAuthProvider};
