//! Transcript-level roll-up of claim reports
//!
//! Gives the persistence layer one status per transcript once all of its
//! claims have been checked.

use serde::{Deserialize, Serialize};

use crate::assemble::ClaimReport;
use crate::consensus::VerdictResult;

/// Overall verdict across a transcript's claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptVerdict {
    NoClaims,
    True,
    False,
    Conflicting,
    Unverified,
}

impl std::fmt::Display for TranscriptVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoClaims => write!(f, "no_claims"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Conflicting => write!(f, "conflicting"),
            Self::Unverified => write!(f, "unverified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    pub total: usize,
    pub true_count: usize,
    pub false_count: usize,
    pub conflicting_count: usize,
    pub unverified_count: usize,
    /// Claims whose check failed before producing a report
    pub failed_count: usize,
    pub verdict: TranscriptVerdict,
    /// Mean confidence over produced reports (0.0 when none)
    pub mean_confidence: f64,
}

impl TranscriptSummary {
    /// Roll up the reports of one transcript.
    ///
    /// `failed` counts claims that never produced a report.
    pub fn from_reports(reports: &[ClaimReport], failed: usize) -> Self {
        let mut summary = Self {
            total: reports.len() + failed,
            true_count: 0,
            false_count: 0,
            conflicting_count: 0,
            unverified_count: 0,
            failed_count: failed,
            verdict: TranscriptVerdict::NoClaims,
            mean_confidence: 0.0,
        };

        for report in reports {
            match report.result {
                VerdictResult::True => summary.true_count += 1,
                VerdictResult::False => summary.false_count += 1,
                VerdictResult::Conflicting => summary.conflicting_count += 1,
                VerdictResult::Unverified => summary.unverified_count += 1,
            }
        }

        if !reports.is_empty() {
            let sum: f64 = reports.iter().map(|r| r.confidence_score).sum();
            summary.mean_confidence = sum / reports.len() as f64;
        }

        summary.verdict = match (summary.true_count > 0, summary.false_count > 0) {
            _ if summary.total == 0 => TranscriptVerdict::NoClaims,
            (true, true) => TranscriptVerdict::Conflicting,
            (true, false) => TranscriptVerdict::True,
            (false, true) => TranscriptVerdict::False,
            (false, false) if summary.conflicting_count > 0 => TranscriptVerdict::Conflicting,
            (false, false) => TranscriptVerdict::Unverified,
        };

        summary
    }

    /// Status string stored on the transcript, e.g. `processed_with_verdict_true`
    pub fn status_label(&self) -> String {
        format!("processed_with_verdict_{}", self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(result: VerdictResult, confidence: f64) -> ClaimReport {
        ClaimReport {
            claim_text: "claim".into(),
            category: None,
            result,
            confidence_score: confidence,
            checked_sources: Vec::new(),
            explanation: "x".into(),
        }
    }

    #[test]
    fn test_no_claims() {
        let summary = TranscriptSummary::from_reports(&[], 0);
        assert_eq!(summary.verdict, TranscriptVerdict::NoClaims);
        assert_eq!(summary.status_label(), "processed_with_verdict_no_claims");
    }

    #[test]
    fn test_mixed_true_and_false_is_conflicting() {
        let reports = vec![
            report(VerdictResult::True, 1.0),
            report(VerdictResult::False, 1.0),
            report(VerdictResult::Unverified, 0.0),
        ];
        let summary = TranscriptSummary::from_reports(&reports, 0);
        assert_eq!(summary.verdict, TranscriptVerdict::Conflicting);
        assert!((summary.mean_confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_true() {
        let reports = vec![
            report(VerdictResult::True, 1.0),
            report(VerdictResult::Unverified, 0.0),
        ];
        let summary = TranscriptSummary::from_reports(&reports, 1);
        assert_eq!(summary.verdict, TranscriptVerdict::True);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.failed_count, 1);
    }

    #[test]
    fn test_only_unverified() {
        let summary =
            TranscriptSummary::from_reports(&[report(VerdictResult::Unverified, 0.0)], 0);
        assert_eq!(summary.verdict, TranscriptVerdict::Unverified);
    }

    #[test]
    fn test_all_failed_is_unverified() {
        let summary = TranscriptSummary::from_reports(&[], 2);
        assert_eq!(summary.verdict, TranscriptVerdict::Unverified);
        assert_eq!(summary.mean_confidence, 0.0);
    }
}
