//! Claim check lifecycle
//!
//! ```text
//! Pending → InProgress → Completed
//!                     ↘ Failed
//! ```
//!
//! Only the pipeline driving a claim moves it between states; each claim's
//! state is owned by exactly one check at a time.

use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimState {
    /// Extracted, not yet dispatched
    #[default]
    Pending,
    /// Evidence being gathered and aggregated
    InProgress,
    /// Verdict produced and assembled
    Completed,
    /// Check aborted (misconfiguration or malformed record)
    Failed,
}

impl ClaimState {
    pub fn can_transition_to(&self, next: ClaimState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Failed)
        )
    }

    pub fn transition(self, next: ClaimState) -> Result<ClaimState, LifecycleError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(LifecycleError {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ClaimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
