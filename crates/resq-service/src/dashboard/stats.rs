//! Dashboard counters.

use serde::{Deserialize, Serialize};

use resq_entity::request::{HelpRequest, RequestStatus};

/// Request counts shown above each dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// All requests in view.
    pub total: usize,
    /// Waiting for a volunteer.
    pub submitted: usize,
    /// Held by a volunteer.
    pub assigned: usize,
    /// Finished.
    pub completed: usize,
    /// Flagged urgent by an admin.
    pub urgent: usize,
}

impl DashboardStats {
    /// Count a set of requests.
    pub fn from_requests(requests: &[HelpRequest]) -> Self {
        requests.iter().fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.status {
                RequestStatus::Submitted => stats.submitted += 1,
                RequestStatus::Assigned => stats.assigned += 1,
                RequestStatus::Completed => stats.completed += 1,
            }
            if r.urgent {
                stats.urgent += 1;
            }
            stats
        })
    }
}
