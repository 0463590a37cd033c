//! Scripted adapters for engine tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deepscope_core::evidence::AdapterId;
use deepscope_core::{Claim, ClaimCategory, SourceRouter};
use deepscope_verify::{AdapterError, Classification, EvidenceAdapter, Finding, RetryPolicy};
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone)]
pub enum Step {
    Answer(Classification),
    Fail(AdapterError),
    Hang,
    Panic,
}

pub struct Scripted {
    id: AdapterId,
    name: String,
    delay: Duration,
    script: Mutex<VecDeque<Step>>,
    by_text: Vec<(String, Step)>,
    fallback: Step,
    calls: AtomicU32,
}

impl Scripted {
    pub fn new(id: AdapterId, fallback: Step) -> Self {
        Self {
            id,
            name: format!("{} stub", id),
            delay: Duration::ZERO,
            script: Mutex::new(VecDeque::new()),
            by_text: Vec::new(),
            fallback,
            calls: AtomicU32::new(0),
        }
    }

    pub fn answering(id: AdapterId, classification: Classification) -> Self {
        Self::new(id, Step::Answer(classification))
    }

    /// Steps played before falling back
    pub fn with_script(self, steps: impl IntoIterator<Item = Step>) -> Self {
        *self.script.lock() = steps.into_iter().collect();
        self
    }

    /// Answer claims containing `needle` with `step`, ahead of the script
    pub fn with_answer_for(mut self, needle: &str, step: Step) -> Self {
        self.by_text.push((needle.to_string(), step));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvidenceAdapter for Scripted {
    fn id(&self) -> AdapterId {
        self.id
    }

    fn source_name(&self) -> &str {
        &self.name
    }

    async fn verify(&self, claim: &Claim, _deadline: Instant) -> Result<Finding, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let step = match self.by_text.iter().find(|(needle, _)| claim.text().contains(needle)) {
            Some((_, step)) => step.clone(),
            None => self
                .script
                .lock()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone()),
        };
        match step {
            Step::Answer(classification) => Ok(Finding::new(classification, "scripted answer")),
            Step::Fail(error) => Err(error),
            Step::Hang => std::future::pending().await,
            Step::Panic => panic!("scripted panic"),
        }
    }
}

/// Router sending every category to `adapters`
pub fn router_for(adapters: &[AdapterId]) -> SourceRouter {
    SourceRouter::empty().with_route(ClaimCategory::Other, adapters.iter().copied())
}

pub fn as_dyn(adapters: &[Arc<Scripted>]) -> Vec<Arc<dyn EvidenceAdapter>> {
    adapters
        .iter()
        .map(|a| Arc::clone(a) as Arc<dyn EvidenceAdapter>)
        .collect()
}

pub fn policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        initial_backoff_ms: 100,
        max_backoff_ms: 1_000,
        attempt_timeout_ms: 2_000,
        claim_ceiling_ms: 10_000,
    }
}
