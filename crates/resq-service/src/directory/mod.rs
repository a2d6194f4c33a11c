//! Identity and role directory.

pub mod service;

pub use service::DirectoryService;
