//! Help-request domain entities and the lifecycle transition table.

pub mod kind;
pub mod lifecycle;
pub mod model;
pub mod status;

pub use kind::{RequestPriority, RequestType};
pub use lifecycle::{RequestAction, Transition};
pub use model::{HelpRequest, NewHelpRequest};
pub use status::RequestStatus;
