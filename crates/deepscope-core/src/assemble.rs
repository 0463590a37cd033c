//! Result assembler
//!
//! Packages a [`VerdictRecord`] into the flat schema the persistence/API
//! boundary stores:
//!
//! ```text
//! claim_text, category, result, confidence_score,
//! checked_sources: [{source_name, verification, evidence, source_url}],
//! explanation
//! ```
//!
//! Pure transformation plus validation; records that fail validation are
//! rejected with [`MalformedRecord`] rather than persisted half-empty.

use serde::{Deserialize, Serialize};

use crate::consensus::{VerdictRecord, VerdictResult};
use crate::error::MalformedRecord;
use crate::evidence::Verification;

/// One source's entry in a persisted claim report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedSource {
    pub source_name: String,
    pub verification: Verification,
    pub evidence: String,
    pub source_url: String,
}

/// Persisted / returned shape of a checked claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimReport {
    pub claim_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub result: VerdictResult,
    pub confidence_score: f64,
    pub checked_sources: Vec<CheckedSource>,
    pub explanation: String,
}

/// Validate `record` and convert it to its persisted shape.
pub fn assemble(record: &VerdictRecord) -> Result<ClaimReport, MalformedRecord> {
    validate(record)?;

    let checked_sources = record
        .evidence()
        .iter()
        .map(|item| CheckedSource {
            source_name: item.source_name.clone(),
            verification: item.verification,
            evidence: item.evidence_text.clone(),
            source_url: item.source_url.clone(),
        })
        .collect();

    Ok(ClaimReport {
        claim_text: record.claim().text().to_string(),
        category: Some(record.claim().category().to_string()),
        result: record.result(),
        confidence_score: record.confidence(),
        checked_sources,
        explanation: record.explanation().to_string(),
    })
}

fn validate(record: &VerdictRecord) -> Result<(), MalformedRecord> {
    if record.claim().text().trim().is_empty() {
        return Err(MalformedRecord::new("claim_text", "is empty"));
    }

    let confidence = record.confidence();
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(MalformedRecord::new(
            "confidence_score",
            format!("{} is outside [0, 1]", confidence),
        ));
    }

    if record.evidence().is_empty() {
        return Err(MalformedRecord::new("checked_sources", "is empty"));
    }

    if let Some(position) = record
        .evidence()
        .iter()
        .position(|item| item.source_name.trim().is_empty())
    {
        return Err(MalformedRecord::new(
            "checked_sources",
            format!("entry {} has no source_name", position),
        ));
    }

    if record.explanation().trim().is_empty() {
        return Err(MalformedRecord::new("explanation", "is empty"));
    }

    let informative = record.evidence().counts().informative();
    let unverified = record.result() == VerdictResult::Unverified;
    if unverified != (informative == 0) {
        return Err(MalformedRecord::new(
            "result",
            format!(
                "'{}' is inconsistent with {} informative sources",
                record.result(),
                informative
            ),
        ));
    }

    Ok(())
}
