//! Evidence source adapter contract
//!
//! An adapter checks one claim against one external source. It translates
//! the claim into a source query, and classifies a successful answer as
//! [`Classification::Match`], [`Classification::Mismatch`] or
//! [`Classification::NoData`]. Failures are returned as [`AdapterError`]
//! values; the orchestrator retries transient ones and turns the rest into
//! `Error` evidence. Adapters never decide on `Error` themselves.

use async_trait::async_trait;
use deepscope_core::evidence::{AdapterId, EvidenceItem, Verification};
use deepscope_core::Claim;
use tokio::time::Instant;

use crate::error::AdapterError;

/// Classification of a successful source answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Match,
    Mismatch,
    NoData,
}

impl Classification {
    /// Classification of a numeric comparison outcome
    pub fn compared(verification: Verification) -> Self {
        match verification {
            Verification::Match => Self::Match,
            Verification::Mismatch => Self::Mismatch,
            Verification::NoData | Verification::Error => Self::NoData,
        }
    }
}

impl From<Classification> for Verification {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Match => Verification::Match,
            Classification::Mismatch => Verification::Mismatch,
            Classification::NoData => Verification::NoData,
        }
    }
}

/// What a source said about a claim
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub classification: Classification,
    pub evidence_text: String,
    pub source_url: String,
    pub numeric_value: Option<f64>,
}

impl Finding {
    pub fn new(classification: Classification, evidence_text: impl Into<String>) -> Self {
        Self {
            classification,
            evidence_text: evidence_text.into(),
            source_url: String::new(),
            numeric_value: None,
        }
    }

    pub fn no_data(reason: impl Into<String>) -> Self {
        Self::new(Classification::NoData, reason)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    pub(crate) fn into_item(self, adapter: AdapterId, source_name: &str) -> EvidenceItem {
        let mut item = EvidenceItem::new(adapter, source_name, self.classification.into())
            .with_evidence(self.evidence_text)
            .with_url(self.source_url);
        item.numeric_value = self.numeric_value;
        item
    }
}

/// One external evidence source.
#[async_trait]
pub trait EvidenceAdapter: Send + Sync {
    /// Routing identifier
    fn id(&self) -> AdapterId;

    /// Human-readable source name shown in evidence
    fn source_name(&self) -> &str;

    /// Check `claim` against the source.
    ///
    /// `deadline` is when the orchestrator abandons this attempt; adapters
    /// may use it to bound their own sub-requests.
    async fn verify(&self, claim: &Claim, deadline: Instant) -> Result<Finding, AdapterError>;
}
