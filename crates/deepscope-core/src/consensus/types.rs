//! Consensus types

use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::evidence::EvidenceSet;

/// Final verdict for a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictResult {
    True,
    False,
    Unverified,
    Conflicting,
}

impl VerdictResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Unverified => "unverified",
            Self::Conflicting => "conflicting",
        }
    }
}

impl std::fmt::Display for VerdictResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusPolicy {
    /// Multiplier on `|2r - 1|` for conflicting verdicts (result clamped to [0, 1])
    pub conflict_scale: f64,
    /// Verdicts below this confidence are flagged for human review
    pub review_threshold: f64,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            conflict_scale: 1.0,
            review_threshold: 0.3,
        }
    }
}

/// Fact-check outcome for one claim.
///
/// Never mutated after the aggregator creates it; a re-check produces a new
/// record so the persistence layer can keep history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictRecord {
    claim: Claim,
    result: VerdictResult,
    confidence: f64,
    evidence: EvidenceSet,
    explanation: String,
}

impl VerdictRecord {
    pub(crate) fn new(
        claim: Claim,
        result: VerdictResult,
        confidence: f64,
        evidence: EvidenceSet,
        explanation: String,
    ) -> Self {
        Self {
            claim,
            result,
            confidence,
            evidence,
            explanation,
        }
    }

    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    pub fn result(&self) -> VerdictResult {
        self.result
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn evidence(&self) -> &EvidenceSet {
        &self.evidence
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}
