//! Per-source request gates
//!
//! Each adapter owns one gate, so one source's throttling or slowness only
//! queues that source's own calls. A gate bounds in-flight requests and
//! enforces a minimum spacing between request starts.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::{sleep_until, Instant};

use crate::error::AdapterError;

/// Gate limits for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Concurrent requests allowed against the source
    pub max_in_flight: usize,
    /// Minimum spacing between request starts, in milliseconds
    pub min_interval_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 4,
            min_interval_ms: 0,
        }
    }
}

#[derive(Debug)]
pub struct SourceGate {
    permits: Semaphore,
    min_interval: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl SourceGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            permits: Semaphore::new(config.max_in_flight.max(1)),
            min_interval: Duration::from_millis(config.min_interval_ms),
            next_start: Mutex::new(None),
        }
    }

    /// Wait for a request slot. The slot is held until the permit drops.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, AdapterError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AdapterError::Transport("source gate closed".to_string()))?;

        if !self.min_interval.is_zero() {
            let start = {
                let mut next = self.next_start.lock();
                let now = Instant::now();
                let start = next.map_or(now, |n| n.max(now));
                *next = Some(start + self.min_interval);
                start
            };
            sleep_until(start).await;
        }

        Ok(permit)
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for SourceGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}
