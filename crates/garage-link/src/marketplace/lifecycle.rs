use super::domain::ServiceRequestStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions a mechanic can take on a service request. Clients never drive the
/// lifecycle; their surface is limited to creation and reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicAction {
    Accept,
    Reject,
    Start,
    Complete,
}

impl MechanicAction {
    pub const fn label(self) -> &'static str {
        match self {
            MechanicAction::Accept => "accept",
            MechanicAction::Reject => "reject",
            MechanicAction::Start => "start",
            MechanicAction::Complete => "complete",
        }
    }
}

impl fmt::Display for MechanicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An attempted transition that the lifecycle does not permit. The stored
/// request is left untouched; callers re-render the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a service request that is {from}")]
pub struct InvalidTransitionError {
    pub from: ServiceRequestStatus,
    pub action: MechanicAction,
}

impl ServiceRequestStatus {
    /// Apply a mechanic action, yielding the next status.
    ///
    /// Legal transitions: `Pending --accept--> Accepted`,
    /// `Pending --reject--> Rejected`, `Accepted --start--> InProgress`,
    /// `InProgress --complete--> Completed`. Everything else, including any
    /// action on a terminal status, is rejected.
    pub fn apply(self, action: MechanicAction) -> Result<Self, InvalidTransitionError> {
        use MechanicAction::*;
        use ServiceRequestStatus::*;

        match (self, action) {
            (Pending, Accept) => Ok(Accepted),
            (Pending, Reject) => Ok(Rejected),
            (Accepted, Start) => Ok(InProgress),
            (InProgress, Complete) => Ok(Completed),
            (from, action) => Err(InvalidTransitionError { from, action }),
        }
    }
}
