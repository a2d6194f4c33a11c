//! Per-role dashboard read models.

pub mod feed;
pub mod service;
pub mod stats;

pub use feed::LiveFeed;
pub use service::{AdminOverview, DashboardService};
pub use stats::DashboardStats;
