//! Consensus scenario and property tests

use deepscope_core::evidence::{AdapterId, EvidenceItem, EvidenceSet, Verification};
use deepscope_core::{
    assemble, Claim, ClaimCategory, ConsensusAggregator, SourceLocator, VerdictResult,
};
use pretty_assertions::assert_eq;

fn claim() -> Claim {
    Claim::new(
        "Alphabet's Q1 2024 revenue was $80.5 billion",
        ClaimCategory::CompanyFinancials,
        SourceLocator::new("yt-abc123#17"),
    )
}

fn evidence(outcomes: &[(AdapterId, Verification)]) -> EvidenceSet {
    outcomes
        .iter()
        .map(|(adapter, verification)| {
            EvidenceItem::new(*adapter, format!("{} source", adapter), *verification)
        })
        .collect()
}

#[test]
fn scenario_all_match_is_true() {
    let set = evidence(&[
        (AdapterId::Filings, Verification::Match),
        (AdapterId::MarketData, Verification::Match),
        (AdapterId::FactCheckSearch, Verification::Match),
    ]);
    let record = ConsensusAggregator::default().aggregate(&claim(), set);
    assert_eq!(record.result(), VerdictResult::True);
    assert_eq!(record.confidence(), 1.0);
}

#[test]
fn scenario_all_mismatch_is_false() {
    let set = evidence(&[
        (AdapterId::Filings, Verification::Mismatch),
        (AdapterId::MarketData, Verification::Mismatch),
        (AdapterId::FactCheckSearch, Verification::Mismatch),
    ]);
    let record = ConsensusAggregator::default().aggregate(&claim(), set);
    assert_eq!(record.result(), VerdictResult::False);
    assert_eq!(record.confidence(), 1.0);
}

#[test]
fn scenario_even_split_is_conflicting_with_zero_confidence() {
    let set = evidence(&[
        (AdapterId::Filings, Verification::Match),
        (AdapterId::MarketData, Verification::Match),
        (AdapterId::FactCheckSearch, Verification::Mismatch),
        (AdapterId::LlmReasoning, Verification::Mismatch),
    ]);
    let record = ConsensusAggregator::default().aggregate(&claim(), set);
    assert_eq!(record.result(), VerdictResult::Conflicting);
    assert_eq!(record.confidence(), 0.0);
}

#[test]
fn scenario_all_no_data_is_unverified() {
    let set = evidence(&[
        (AdapterId::Filings, Verification::NoData),
        (AdapterId::MarketData, Verification::NoData),
        (AdapterId::FactCheckSearch, Verification::NoData),
    ]);
    let record = ConsensusAggregator::default().aggregate(&claim(), set);
    assert_eq!(record.result(), VerdictResult::Unverified);
    assert_eq!(record.confidence(), 0.0);
    assert!(record
        .explanation()
        .starts_with("No source had relevant data"));
}

#[test]
fn scenario_timeout_is_retained_but_does_not_vote() {
    let set = EvidenceSet::new(vec![
        EvidenceItem::timed_out(AdapterId::Filings, "SEC EDGAR"),
        EvidenceItem::new(AdapterId::MarketData, "Alpha Vantage", Verification::Match),
        EvidenceItem::new(AdapterId::FactCheckSearch, "Google Fact Check", Verification::Match),
    ]);
    let record = ConsensusAggregator::default().aggregate(&claim(), set);
    assert_eq!(record.result(), VerdictResult::True);
    assert_eq!(record.confidence(), 1.0);
    assert_eq!(record.evidence().len(), 3);

    let failed = &record.evidence().items()[0];
    assert_eq!(failed.verification, Verification::Error);
    assert_eq!(failed.evidence_text, "timed out");
    assert!(record
        .explanation()
        .contains("Unavailable: SEC EDGAR (timed out)"));
}

#[test]
fn scenario_single_numeric_mismatch_is_false() {
    let claim = Claim::new(
        "Water boils at 105°C at sea level",
        ClaimCategory::Other,
        SourceLocator::detached(),
    );
    let set = EvidenceSet::new(vec![EvidenceItem::new(
        AdapterId::ReferenceTable,
        "Reference figures",
        Verification::Mismatch,
    )
    .with_value(100.0)]);
    let record = ConsensusAggregator::default().aggregate(&claim, set);
    assert_eq!(record.result(), VerdictResult::False);
    assert_eq!(record.confidence(), 1.0);
}

#[test]
fn aggregation_is_deterministic() {
    let set = evidence(&[
        (AdapterId::Filings, Verification::Match),
        (AdapterId::MarketData, Verification::Error),
        (AdapterId::FactCheckSearch, Verification::Mismatch),
        (AdapterId::LlmReasoning, Verification::Match),
    ]);
    let aggregator = ConsensusAggregator::default();
    let first = aggregator.aggregate(&claim(), set.clone());
    let second = aggregator.aggregate(&claim(), set);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&assemble(&first).unwrap()).unwrap(),
        serde_json::to_vec(&assemble(&second).unwrap()).unwrap()
    );
}

#[test]
fn aggregation_is_order_independent() {
    let items = vec![
        EvidenceItem::new(AdapterId::Filings, "SEC EDGAR", Verification::Match),
        EvidenceItem::new(AdapterId::MarketData, "Alpha Vantage", Verification::NoData),
        EvidenceItem::error(AdapterId::ReferenceTable, "Reference figures", "bad table"),
        EvidenceItem::new(AdapterId::FactCheckSearch, "Google Fact Check", Verification::Mismatch),
        EvidenceItem::new(AdapterId::LlmReasoning, "LLM reasoning", Verification::Match),
    ];

    let aggregator = ConsensusAggregator::default();
    let baseline = aggregator.aggregate(&claim(), EvidenceSet::new(items.clone()));

    // Every rotation and its reverse
    for shift in 0..items.len() {
        let mut rotated = items.clone();
        rotated.rotate_left(shift);
        assert_eq!(
            aggregator.aggregate(&claim(), EvidenceSet::new(rotated.clone())),
            baseline
        );
        rotated.reverse();
        assert_eq!(
            aggregator.aggregate(&claim(), EvidenceSet::new(rotated)),
            baseline
        );
    }

    // Display order follows adapter precedence, not input order
    let order: Vec<AdapterId> = baseline.evidence().iter().map(|i| i.adapter).collect();
    assert_eq!(order, AdapterId::ALL.to_vec());
}

#[test]
fn conflicting_confidence_is_monotonic_in_agreement() {
    let aggregator = ConsensusAggregator::default();
    let mut previous = -1.0;

    // 10 informative sources: 5..=9 matching covers ratio 0.5 up to 0.9
    for matches in 5..=9usize {
        let items: Vec<EvidenceItem> = (0..10)
            .map(|i| {
                let verification = if i < matches {
                    Verification::Match
                } else {
                    Verification::Mismatch
                };
                EvidenceItem::new(AdapterId::LlmReasoning, format!("model-{i}"), verification)
            })
            .collect();

        let record = aggregator.aggregate(&claim(), EvidenceSet::new(items));
        assert_eq!(record.result(), VerdictResult::Conflicting);
        assert!(
            record.confidence() >= previous,
            "confidence fell at {} matches",
            matches
        );
        previous = record.confidence();
    }
}

#[test]
fn unverified_iff_no_informative_evidence() {
    let aggregator = ConsensusAggregator::default();
    let outcomes = [
        Verification::Match,
        Verification::Mismatch,
        Verification::NoData,
        Verification::Error,
    ];

    for a in outcomes {
        for b in outcomes {
            let set = evidence(&[(AdapterId::Filings, a), (AdapterId::MarketData, b)]);
            let record = aggregator.aggregate(&claim(), set);
            let informative = a.is_informative() || b.is_informative();
            assert_eq!(
                record.result() == VerdictResult::Unverified,
                !informative,
                "{a} + {b}"
            );
        }
    }
}
