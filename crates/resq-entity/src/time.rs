//! Timestamp helpers shared by the entity models.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// The current time at the precision documents store (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// The current time, but never earlier than `floor`.
///
/// Keeps `created_at <= assigned_at <= completed_at` even when clocks of
/// different clients disagree slightly.
pub fn not_before(floor: DateTime<Utc>) -> DateTime<Utc> {
    now().max(floor)
}

/// The current time, strictly later than `previous` when given.
pub fn strictly_after(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let t = now();
    match previous {
        Some(p) if t <= p => p + Duration::microseconds(1),
        _ => t,
    }
}
