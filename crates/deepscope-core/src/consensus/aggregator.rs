//! Deterministic consensus over an evidence set

use super::explain;
use super::types::{ConsensusPolicy, VerdictRecord, VerdictResult};
use crate::claim::Claim;
use crate::evidence::EvidenceSet;

/// Turns per-source evidence into a verdict with confidence and explanation
#[derive(Debug, Clone, Default)]
pub struct ConsensusAggregator {
    policy: ConsensusPolicy,
}

impl ConsensusAggregator {
    pub fn new(policy: ConsensusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// Aggregate `evidence` into a verdict for `claim`.
    ///
    /// No-data and error items never vote but stay in the record.
    pub fn aggregate(&self, claim: &Claim, evidence: EvidenceSet) -> VerdictRecord {
        let evidence = evidence.into_precedence_order();
        let counts = evidence.counts();
        let informative = counts.informative();

        let (result, confidence) = if informative == 0 {
            (VerdictResult::Unverified, 0.0)
        } else {
            let ratio = counts.matches as f64 / informative as f64;
            self.score(ratio)
        };

        let explanation = explain::explain(result, &counts, &evidence);

        VerdictRecord::new(claim.clone(), result, confidence, evidence, explanation)
    }

    /// Result and confidence for an agreement ratio over informative sources
    fn score(&self, agreement_ratio: f64) -> (VerdictResult, f64) {
        if agreement_ratio >= 1.0 {
            (VerdictResult::True, agreement_ratio)
        } else if agreement_ratio <= 0.0 {
            (VerdictResult::False, 1.0 - agreement_ratio)
        } else {
            // Zero at an even split, rising toward either unanimous edge.
            // An exact 0.5 tie stays Conflicting.
            let polarization = (2.0 * agreement_ratio - 1.0).abs();
            let confidence = (polarization * self.policy.conflict_scale).clamp(0.0, 1.0);
            (VerdictResult::Conflicting, confidence)
        }
    }

    /// Whether a verdict should go to human review
    pub fn requires_review(&self, record: &VerdictRecord) -> bool {
        record.confidence() < self.policy.review_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimCategory, SourceLocator};
    use crate::evidence::{AdapterId, EvidenceItem, Verification};
    use pretty_assertions::assert_eq;

    fn claim() -> Claim {
        Claim::new(
            "Microsoft's FY2023 revenue was $211.9 billion",
            ClaimCategory::CompanyFinancials,
            SourceLocator::new("video-7#12"),
        )
    }

    fn item(adapter: AdapterId, verification: Verification) -> EvidenceItem {
        EvidenceItem::new(adapter, adapter.as_str(), verification)
    }

    fn set(outcomes: &[(AdapterId, Verification)]) -> EvidenceSet {
        outcomes.iter().map(|(a, v)| item(*a, *v)).collect()
    }

    #[test]
    fn test_score_edges() {
        let agg = ConsensusAggregator::default();
        assert_eq!(agg.score(1.0), (VerdictResult::True, 1.0));
        assert_eq!(agg.score(0.0), (VerdictResult::False, 1.0));
        assert_eq!(agg.score(0.5), (VerdictResult::Conflicting, 0.0));
    }

    #[test]
    fn test_conflict_confidence_rises_with_agreement() {
        let agg = ConsensusAggregator::default();
        let mut previous = -1.0;
        for step in 0..50 {
            let ratio = 0.5 + step as f64 * 0.01;
            let (result, confidence) = agg.score(ratio);
            assert_eq!(result, VerdictResult::Conflicting);
            assert!(confidence >= previous, "confidence dropped at ratio {ratio}");
            previous = confidence;
        }
    }

    #[test]
    fn test_conflict_scale_is_clamped() {
        let agg = ConsensusAggregator::new(ConsensusPolicy {
            conflict_scale: 5.0,
            ..ConsensusPolicy::default()
        });
        let (_, confidence) = agg.score(0.9);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_two_to_one_split() {
        let evidence = set(&[
            (AdapterId::Filings, Verification::Match),
            (AdapterId::MarketData, Verification::Match),
            (AdapterId::FactCheckSearch, Verification::Mismatch),
        ]);
        let record = ConsensusAggregator::default().aggregate(&claim(), evidence);
        assert_eq!(record.result(), VerdictResult::Conflicting);
        assert!((record.confidence() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_errors_and_no_data_retained() {
        let evidence = set(&[
            (AdapterId::Filings, Verification::Error),
            (AdapterId::MarketData, Verification::Mismatch),
            (AdapterId::LlmReasoning, Verification::NoData),
        ]);
        let record = ConsensusAggregator::default().aggregate(&claim(), evidence);
        assert_eq!(record.result(), VerdictResult::False);
        assert_eq!(record.confidence(), 1.0);
        assert_eq!(record.evidence().len(), 3);
    }

    #[test]
    fn test_empty_evidence_is_unverified() {
        let record = ConsensusAggregator::default().aggregate(&claim(), EvidenceSet::default());
        assert_eq!(record.result(), VerdictResult::Unverified);
        assert_eq!(record.confidence(), 0.0);
    }

    #[test]
    fn test_requires_review() {
        let agg = ConsensusAggregator::default();
        let unverified = agg.aggregate(
            &claim(),
            set(&[(AdapterId::Filings, Verification::NoData)]),
        );
        assert!(agg.requires_review(&unverified));

        let confirmed = agg.aggregate(
            &claim(),
            set(&[(AdapterId::Filings, Verification::Match)]),
        );
        assert!(!agg.requires_review(&confirmed));
    }
}
