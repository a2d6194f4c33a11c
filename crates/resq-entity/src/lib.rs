//! # resq-entity
//!
//! Domain entity models for ResQ. Every struct in this crate represents a
//! document in one of the `users`, `requests`, or `notifications`
//! collections, or a domain value object. Timestamps are stored as
//! microseconds since the Unix epoch so that documents order correctly.

pub mod notification;
pub mod request;
pub mod time;
pub mod user;
