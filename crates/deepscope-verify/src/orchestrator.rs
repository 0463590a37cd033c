//! Verification orchestrator
//!
//! Fans a claim out to every adapter its category routes to, waits for all
//! of them to settle, and returns one evidence item per routed adapter in
//! route order.
//!
//! Adapter failures never escape: errors, panics and timeouts all become
//! `Error` items. The only failure surfaced to the caller is a routing
//! table that cannot serve the claim.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use deepscope_core::evidence::{AdapterId, EvidenceItem, EvidenceSet};
use deepscope_core::{Claim, ConfigError, SourceRouter};
use futures::future::join_all;
use futures::FutureExt;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::adapter::EvidenceAdapter;
use crate::error::AdapterError;
use crate::retry::{call_with_retry, RetryPolicy};
use deepscope::tracing::prefix;

pub struct Orchestrator {
    router: SourceRouter,
    adapters: HashMap<AdapterId, Arc<dyn EvidenceAdapter>>,
    policy: RetryPolicy,
}

impl Orchestrator {
    /// Build an orchestrator, validating the router against the registry.
    ///
    /// Every category must route to at least one adapter and every routed
    /// adapter must be registered exactly once.
    pub fn new(
        router: SourceRouter,
        adapters: Vec<Arc<dyn EvidenceAdapter>>,
        policy: RetryPolicy,
    ) -> Result<Self, ConfigError> {
        let ids: Vec<AdapterId> = adapters.iter().map(|a| a.id()).collect();
        router.validate(&ids)?;

        let adapters = adapters.into_iter().map(|a| (a.id(), a)).collect();
        Ok(Self {
            router,
            adapters,
            policy,
        })
    }

    pub fn router(&self) -> &SourceRouter {
        &self.router
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Gather evidence for `claim` from every routed adapter.
    ///
    /// Returns once every dispatch has settled or the claim ceiling has
    /// passed. The set always holds exactly one item per routed adapter.
    pub async fn gather(&self, claim: &Claim) -> Result<EvidenceSet, ConfigError> {
        let category = claim.category();
        let route = self.router.select(category);
        if route.is_empty() {
            return Err(ConfigError::EmptyRoute(category));
        }

        let mut dispatched = Vec::with_capacity(route.len());
        for id in route {
            let adapter = self
                .adapters
                .get(id)
                .ok_or(ConfigError::MissingAdapter {
                    category,
                    adapter: *id,
                })?;
            dispatched.push(Arc::clone(adapter));
        }

        let ceiling = Instant::now() + self.policy.claim_ceiling();
        info!(
            "{} Gathering evidence from {} source(s) for {} claim",
            prefix::VERIFY,
            dispatched.len(),
            category
        );

        // join_all yields results in input order, which is route order
        let items = join_all(
            dispatched
                .iter()
                .map(|adapter| self.dispatch(adapter.as_ref(), claim, ceiling)),
        )
        .await;

        Ok(EvidenceSet::new(items))
    }

    async fn dispatch(
        &self,
        adapter: &dyn EvidenceAdapter,
        claim: &Claim,
        ceiling: Instant,
    ) -> EvidenceItem {
        let started = Instant::now();
        let call = AssertUnwindSafe(call_with_retry(adapter, claim, &self.policy, ceiling))
            .catch_unwind();

        let item = match timeout_at(ceiling, call).await {
            Ok(Ok(report)) => match report.outcome {
                Ok(finding) => {
                    debug!(
                        source = adapter.source_name(),
                        attempts = report.attempts,
                        verification = ?finding.classification,
                        "source settled"
                    );
                    finding.into_item(adapter.id(), adapter.source_name())
                }
                Err(error) => {
                    warn!(
                        source = adapter.source_name(),
                        attempts = report.attempts,
                        "source failed: {}",
                        error
                    );
                    EvidenceItem::error(adapter.id(), adapter.source_name(), error.to_string())
                }
            },
            Ok(Err(_panic)) => {
                warn!(source = adapter.source_name(), "source adapter panicked");
                EvidenceItem::error(
                    adapter.id(),
                    adapter.source_name(),
                    AdapterError::Panicked.to_string(),
                )
            }
            Err(_elapsed) => {
                warn!(source = adapter.source_name(), "claim ceiling reached");
                EvidenceItem::timed_out(adapter.id(), adapter.source_name())
            }
        };

        item.with_latency(started.elapsed())
    }
}
