//! Retry state machine for a single adapter call
//!
//! ```text
//! Pending(n) ──ok──────────────▶ Succeeded
//!     │ ──permanent / n > max──▶ Failed
//!     └─transient───▶ Retryable(n) ──backoff──▶ Pending(n + 1)
//! ```
//!
//! Each attempt is bounded by the attempt timeout and by the claim-level
//! ceiling, whichever comes first.

use std::time::Duration;

use deepscope_core::Claim;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, warn};

use crate::adapter::{EvidenceAdapter, Finding};
use crate::error::AdapterError;

/// Timeout and retry policy for evidence gathering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt, for transient failures only
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Bound on one adapter attempt
    pub attempt_timeout_ms: u64,
    /// Bound on gathering all evidence for one claim
    pub claim_ceiling_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 250,
            max_backoff_ms: 4_000,
            attempt_timeout_ms: 10_000,
            claim_ceiling_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn claim_ceiling(&self) -> Duration {
        Duration::from_millis(self.claim_ceiling_ms)
    }

    /// Delay before the retry that follows failed attempt `attempt` (1-based).
    ///
    /// Exponential from `initial_backoff_ms`, capped at `max_backoff_ms`. A
    /// source-supplied retry-after is honoured when longer, under the same cap.
    pub fn backoff(&self, attempt: u32, error: &AdapterError) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        let mut delay = Duration::from_millis(delay);

        if let AdapterError::RateLimited {
            retry_after: Some(after),
        } = error
        {
            delay = delay.max(*after);
        }

        delay.min(Duration::from_millis(self.max_backoff_ms))
    }
}

enum CallState {
    Pending { attempt: u32 },
    Retryable { attempt: u32, error: AdapterError },
    Succeeded(Finding),
    Failed(AdapterError),
}

/// Result of driving one adapter call to completion
#[derive(Debug)]
pub struct CallReport {
    pub outcome: Result<Finding, AdapterError>,
    pub attempts: u32,
}

/// Run `adapter` against `claim` under `policy`, never past `ceiling`.
pub async fn call_with_retry(
    adapter: &dyn EvidenceAdapter,
    claim: &Claim,
    policy: &RetryPolicy,
    ceiling: Instant,
) -> CallReport {
    let mut state = CallState::Pending { attempt: 1 };
    let mut attempts = 0;

    loop {
        state = match state {
            CallState::Pending { attempt } => {
                attempts = attempt;
                let deadline = (Instant::now() + policy.attempt_timeout()).min(ceiling);
                let outcome = timeout_at(deadline, adapter.verify(claim, deadline))
                    .await
                    .unwrap_or(Err(AdapterError::Timeout));

                match outcome {
                    Ok(finding) => {
                        debug!(source = adapter.source_name(), attempt, "source answered");
                        CallState::Succeeded(finding)
                    }
                    Err(error) if error.is_transient() && attempt <= policy.max_retries => {
                        CallState::Retryable { attempt, error }
                    }
                    Err(error) => CallState::Failed(error),
                }
            }
            CallState::Retryable { attempt, error } => {
                let delay = policy.backoff(attempt, &error);
                warn!(
                    source = adapter.source_name(),
                    attempt,
                    ?delay,
                    "transient failure, retrying: {}",
                    error
                );
                sleep(delay).await;
                CallState::Pending {
                    attempt: attempt + 1,
                }
            }
            CallState::Succeeded(finding) => {
                return CallReport {
                    outcome: Ok(finding),
                    attempts,
                }
            }
            CallState::Failed(error) => {
                return CallReport {
                    outcome: Err(error),
                    attempts,
                }
            }
        };
    }
}
