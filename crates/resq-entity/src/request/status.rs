//! Request status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use resq_core::AppError;

/// Lifecycle state of a help request.
///
/// States only move forward: Submitted → Assigned → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Waiting for a volunteer.
    Submitted,
    /// Held by a volunteer.
    Assigned,
    /// Fulfilled. Terminal.
    Completed,
}

impl RequestStatus {
    /// All states in lifecycle order.
    pub const ALL: [RequestStatus; 3] = [Self::Submitted, Self::Assigned, Self::Completed];

    /// Check if the request is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether moving from `self` to `next` is a legal single step.
    ///
    /// Staying put is legal (urgency toggles, admin reassignment).
    pub fn can_become(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Submitted)
                | (Self::Submitted, Self::Assigned)
                | (Self::Assigned, Self::Assigned)
                | (Self::Assigned, Self::Completed)
                | (Self::Completed, Self::Completed)
        )
    }

    /// Return the status as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Assigned => "Assigned",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            _ => Err(AppError::validation(format!(
                "Invalid status: '{s}'. Expected one of: Submitted, Assigned, Completed"
            ))),
        }
    }
}
