//! Claim pipeline
//!
//! Drives each claim through its lifecycle:
//!
//! ```text
//! Pending → InProgress ─gather─aggregate─assemble─→ Completed
//!                      ╰─routing or record failure─→ Failed
//! ```
//!
//! Every claim owns its own state; a failed claim never affects its
//! siblings in the same transcript.

use deepscope::tracing::prefix;
use deepscope_core::{
    assemble, Claim, ClaimReport, ClaimState, ConsensusAggregator, ExtractedClaim, SourceLocator,
    SourceRouter, TranscriptSummary,
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info};

use crate::config::VerifyConfig;
use crate::error::{CheckError, VerifyError};
use crate::orchestrator::Orchestrator;

/// Terminal outcome of one claim check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimOutcome {
    pub claim: Claim,
    pub state: ClaimState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ClaimReport>,
    /// Confidence fell below the review threshold
    pub needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// All outcomes for one transcript, in extraction order, with the roll-up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptOutcome {
    pub transcript_id: String,
    pub status: String,
    pub summary: TranscriptSummary,
    pub outcomes: Vec<ClaimOutcome>,
}

pub struct FactCheckPipeline {
    orchestrator: Orchestrator,
    aggregator: ConsensusAggregator,
    claim_concurrency: usize,
}

impl FactCheckPipeline {
    pub fn new(
        orchestrator: Orchestrator,
        aggregator: ConsensusAggregator,
        claim_concurrency: usize,
    ) -> Self {
        Self {
            orchestrator,
            aggregator,
            claim_concurrency: claim_concurrency.max(1),
        }
    }

    /// Build the pipeline and its built-in adapters from configuration.
    ///
    /// Fails when the routing table does not cover the registered adapters.
    pub fn from_config(config: &VerifyConfig) -> Result<Self, VerifyError> {
        config.validate()?;
        let adapters = config.build_adapters()?;
        let orchestrator = Orchestrator::new(SourceRouter::new(), adapters, config.retry)?;
        Ok(Self::new(
            orchestrator,
            ConsensusAggregator::new(config.consensus),
            config.claim_concurrency,
        ))
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Check a single claim end to end.
    pub async fn check_claim(&self, claim: Claim) -> ClaimOutcome {
        let mut state = ClaimState::Pending;

        match self.run(&claim, &mut state).await {
            Ok((report, needs_review)) => {
                info!(
                    "{} {} claim reported as {} ({:.2})",
                    prefix::PERSIST,
                    claim.category(),
                    report.result,
                    report.confidence_score
                );
                ClaimOutcome {
                    claim,
                    state,
                    report: Some(report),
                    needs_review,
                    error: None,
                }
            }
            Err(err) => {
                error!(locator = claim.source_locator().as_str(), "Claim check failed: {}", err);
                ClaimOutcome {
                    claim,
                    state: state.transition(ClaimState::Failed).unwrap_or(ClaimState::Failed),
                    report: None,
                    needs_review: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    async fn run(
        &self,
        claim: &Claim,
        state: &mut ClaimState,
    ) -> Result<(ClaimReport, bool), CheckError> {
        *state = state.transition(ClaimState::InProgress)?;

        let evidence = self.orchestrator.gather(claim).await?;
        let record = self.aggregator.aggregate(claim, evidence);
        info!(
            "{} {} at {:.2}: {}",
            prefix::CONSENSUS,
            record.result(),
            record.confidence(),
            record.explanation()
        );

        let needs_review = self.aggregator.requires_review(&record);
        let report = assemble(&record)?;

        *state = state.transition(ClaimState::Completed)?;
        Ok((report, needs_review))
    }

    /// Check claims with bounded parallelism, preserving input order.
    pub async fn check_claims(&self, claims: Vec<Claim>) -> Vec<ClaimOutcome> {
        stream::iter(claims)
            .map(|claim| self.check_claim(claim))
            .buffered(self.claim_concurrency)
            .collect()
            .await
    }

    /// Check every claim extracted from one transcript and roll up the result.
    ///
    /// Claims get locators `"<transcript_id>#<index>"` in extraction order.
    pub async fn check_transcript(
        &self,
        transcript_id: &str,
        extracted: Vec<ExtractedClaim>,
    ) -> TranscriptOutcome {
        let claims: Vec<Claim> = extracted
            .into_iter()
            .enumerate()
            .map(|(index, claim)| {
                Claim::from_extracted(
                    claim,
                    SourceLocator::new(format!("{transcript_id}#{index}")),
                )
            })
            .collect();

        info!(
            transcript = transcript_id,
            "{} Checking {} claim(s)",
            prefix::VERIFY,
            claims.len()
        );

        let outcomes = self.check_claims(claims).await;
        let reports: Vec<ClaimReport> = outcomes.iter().filter_map(|o| o.report.clone()).collect();
        let failed = outcomes
            .iter()
            .filter(|o| o.state == ClaimState::Failed)
            .count();
        let summary = TranscriptSummary::from_reports(&reports, failed);

        TranscriptOutcome {
            transcript_id: transcript_id.to_string(),
            status: summary.status_label(),
            summary,
            outcomes,
        }
    }
}
