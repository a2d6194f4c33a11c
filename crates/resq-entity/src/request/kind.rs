//! Request type and creation-time priority enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use resq_core::AppError;

/// The kind of help being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Food or drinking water.
    Food,
    /// Medicine or medical assistance.
    Medicine,
    /// Rescue from danger.
    Rescue,
    /// Temporary shelter.
    Shelter,
    /// Transport or evacuation.
    Transport,
    /// Anything else.
    Other,
}

impl RequestType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Medicine => "medicine",
            Self::Rescue => "rescue",
            Self::Shelter => "shelter",
            Self::Transport => "transport",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err(AppError::validation("Request type is required")),
            "food" => Ok(Self::Food),
            "medicine" => Ok(Self::Medicine),
            "rescue" => Ok(Self::Rescue),
            "shelter" => Ok(Self::Shelter),
            "transport" => Ok(Self::Transport),
            "other" => Ok(Self::Other),
            _ => Err(AppError::validation(format!(
                "Invalid request type: '{s}'. Expected one of: food, medicine, rescue, shelter, transport, other"
            ))),
        }
    }
}

/// Urgency the citizen selected when creating the request.
///
/// Immutable after creation. The admin-controlled `urgent` flag on
/// [`HelpRequest`](super::HelpRequest) is the canonical urgency signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    /// Not urgent.
    Low,
    /// Default level.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
    /// Life-threatening.
    Critical,
}

impl RequestPriority {
    /// Return the numeric level (higher = more urgent).
    pub fn level(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestPriority {
    type Err = AppError;

    /// Blank input selects the default (`medium`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(Self::default()),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(AppError::validation(format!(
                "Invalid priority: '{s}'. Expected one of: low, medium, high, critical"
            ))),
        }
    }
}
