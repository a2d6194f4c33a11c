//! The single transition table for help requests.
//!
//! Every lifecycle operation asks [`RequestAction::apply`] whether it may
//! run from the current status before issuing its conditional write.

use serde::{Deserialize, Serialize};
use std::fmt;

use resq_core::AppError;

use super::status::RequestStatus;

/// A mutation that can be applied to an existing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    /// A volunteer takes a submitted request.
    Claim,
    /// An admin (re)assigns the request to a volunteer.
    Reassign,
    /// The assigned volunteer or an admin finishes the request.
    Complete,
    /// An admin toggles the urgent flag.
    SetUrgent,
    /// An admin removes a submitted request.
    Delete,
}

/// What applying an action does to the request's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request ends up in this status.
    To(RequestStatus),
    /// The record is removed.
    Remove,
}

impl RequestAction {
    /// Look up the transition for this action from `from`.
    ///
    /// Fails with a conflict error when the action is not allowed from the
    /// current status, which is what a concurrent actor observes after
    /// losing a race.
    pub fn apply(self, from: RequestStatus) -> Result<Transition, AppError> {
        use RequestStatus::*;

        let transition = match (self, from) {
            (Self::Claim, Submitted) => Some(Transition::To(Assigned)),
            (Self::Reassign, Submitted | Assigned) => Some(Transition::To(Assigned)),
            (Self::Complete, Assigned) => Some(Transition::To(Completed)),
            (Self::SetUrgent, status) => Some(Transition::To(status)),
            (Self::Delete, Submitted) => Some(Transition::Remove),
            _ => None,
        };

        transition.ok_or_else(|| {
            AppError::conflict(format!("Cannot {self} a request that is {from}"))
        })
    }

    /// The status the stored record must still hold for the write to apply,
    /// or `None` when the action does not depend on status.
    pub fn required_status(self) -> Option<RequestStatus> {
        match self {
            Self::Claim | Self::Delete => Some(RequestStatus::Submitted),
            Self::Complete => Some(RequestStatus::Assigned),
            Self::Reassign | Self::SetUrgent => None,
        }
    }

    /// Return the action as a lowercase verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Reassign => "reassign",
            Self::Complete => "complete",
            Self::SetUrgent => "set urgency on",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
