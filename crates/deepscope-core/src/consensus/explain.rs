//! Explanation templates
//!
//! Fixed string templates over the ordered evidence, so the same evidence
//! always explains the same way.

use super::types::VerdictResult;
use crate::evidence::{EvidenceItem, EvidenceSet, Verification, VoteCounts};

const MAX_REASON_CHARS: usize = 120;

pub(crate) fn explain(result: VerdictResult, counts: &VoteCounts, evidence: &EvidenceSet) -> String {
    let informative = counts.informative();
    let mut text = match result {
        VerdictResult::Unverified => {
            let mut text = String::from("No source had relevant data for this claim");
            if counts.total() == 0 {
                text.push_str(": no sources were consulted.");
            } else {
                text.push_str(&format!(
                    " ({} returned no data, {} failed).",
                    counts.no_data, counts.errors
                ));
            }
            text
        }
        VerdictResult::True => format!(
            "Confirmed by {} of {} sources with relevant data: {}.",
            counts.matches,
            informative,
            names(evidence, Verification::Match)
        ),
        VerdictResult::False => format!(
            "Contradicted by {} of {} sources with relevant data: {}.",
            counts.mismatches,
            informative,
            names(evidence, Verification::Mismatch)
        ),
        VerdictResult::Conflicting => format!(
            "Sources disagree: {} of {} confirm ({}) and {} contradict ({}).",
            counts.matches,
            informative,
            names(evidence, Verification::Match),
            counts.mismatches,
            names(evidence, Verification::Mismatch)
        ),
    };

    let failures: Vec<String> = evidence
        .iter()
        .filter(|item| item.verification == Verification::Error)
        .map(failure)
        .collect();
    if !failures.is_empty() {
        text.push_str(" Unavailable: ");
        text.push_str(&failures.join("; "));
        text.push('.');
    }

    text
}

fn names(evidence: &EvidenceSet, verification: Verification) -> String {
    evidence
        .iter()
        .filter(|item| item.verification == verification)
        .map(|item| item.source_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn failure(item: &EvidenceItem) -> String {
    let reason = item.evidence_text.trim();
    if reason.is_empty() {
        return item.source_name.clone();
    }
    let mut clipped: String = reason.chars().take(MAX_REASON_CHARS).collect();
    if clipped.len() < reason.len() {
        clipped.push('…');
    }
    format!("{} ({})", item.source_name, clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::AdapterId;

    fn evidence(items: Vec<EvidenceItem>) -> EvidenceSet {
        EvidenceSet::new(items).into_precedence_order()
    }

    #[test]
    fn test_true_names_confirming_sources() {
        let set = evidence(vec![
            EvidenceItem::new(AdapterId::FactCheckSearch, "Google Fact Check", Verification::Match),
            EvidenceItem::new(AdapterId::Filings, "SEC EDGAR", Verification::Match),
        ]);
        let text = explain(VerdictResult::True, &set.counts(), &set);
        assert_eq!(
            text,
            "Confirmed by 2 of 2 sources with relevant data: SEC EDGAR, Google Fact Check."
        );
    }

    #[test]
    fn test_conflicting_names_both_sides() {
        let set = evidence(vec![
            EvidenceItem::new(AdapterId::Filings, "SEC EDGAR", Verification::Match),
            EvidenceItem::new(AdapterId::LlmReasoning, "LLM", Verification::Mismatch),
        ]);
        let text = explain(VerdictResult::Conflicting, &set.counts(), &set);
        assert_eq!(
            text,
            "Sources disagree: 1 of 2 confirm (SEC EDGAR) and 1 contradict (LLM)."
        );
    }

    #[test]
    fn test_failures_are_listed() {
        let set = evidence(vec![
            EvidenceItem::new(AdapterId::FactCheckSearch, "Google Fact Check", Verification::NoData),
            EvidenceItem::timed_out(AdapterId::MarketData, "Alpha Vantage"),
        ]);
        let text = explain(VerdictResult::Unverified, &set.counts(), &set);
        assert_eq!(
            text,
            "No source had relevant data for this claim (1 returned no data, 1 failed). \
             Unavailable: Alpha Vantage (timed out)."
        );
    }

    #[test]
    fn test_long_reasons_are_clipped() {
        let long = "x".repeat(500);
        let set = evidence(vec![EvidenceItem::error(AdapterId::Filings, "SEC EDGAR", long)]);
        let text = explain(VerdictResult::Unverified, &set.counts(), &set);
        assert!(text.len() < 300);
        assert!(text.contains('…'));
    }
}
