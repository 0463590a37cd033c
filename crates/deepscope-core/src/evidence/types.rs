//! Evidence type definitions

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier of an evidence source adapter.
///
/// The declaration order is the fixed adapter precedence: routes list
/// adapters in this order and evidence is displayed in this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AdapterId {
    /// Regulatory filings database (SEC EDGAR)
    Filings,
    /// Market-data provider
    MarketData,
    /// Curated reference figures
    ReferenceTable,
    /// Published fact-check search
    FactCheckSearch,
    /// LLM reasoning check
    LlmReasoning,
}

impl AdapterId {
    pub const ALL: [AdapterId; 5] = [
        Self::Filings,
        Self::MarketData,
        Self::ReferenceTable,
        Self::FactCheckSearch,
        Self::LlmReasoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filings => "filings",
            Self::MarketData => "market_data",
            Self::ReferenceTable => "reference_table",
            Self::FactCheckSearch => "fact_check_search",
            Self::LlmReasoning => "llm_reasoning",
        }
    }
}

impl std::fmt::Display for AdapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one claim against one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    /// Source confirms the claim as stated
    Match,
    /// Source contradicts the claim
    Mismatch,
    /// Source answered but holds nothing relevant
    NoData,
    /// Source could not be consulted (network, auth, parse, timeout)
    Error,
}

impl Verification {
    /// Whether this outcome counts as a vote in consensus
    pub fn is_informative(&self) -> bool {
        matches!(self, Self::Match | Self::Mismatch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::NoData => "no_data",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Verification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One adapter's outcome for one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub adapter: AdapterId,
    pub source_name: String,
    pub verification: Verification,
    #[serde(default)]
    pub evidence_text: String,
    #[serde(default)]
    pub source_url: String,
    /// Figure reported by the source, for numeric comparisons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(rename = "latency_ms", with = "duration_ms", default)]
    pub raw_latency: Duration,
}

impl EvidenceItem {
    pub fn new(
        adapter: AdapterId,
        source_name: impl Into<String>,
        verification: Verification,
    ) -> Self {
        Self {
            adapter,
            source_name: source_name.into(),
            verification,
            evidence_text: String::new(),
            source_url: String::new(),
            numeric_value: None,
            raw_latency: Duration::ZERO,
        }
    }

    /// Adapter-level failure
    pub fn error(
        adapter: AdapterId,
        source_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(adapter, source_name, Verification::Error).with_evidence(reason)
    }

    /// Adapter still pending when the claim-level ceiling expired
    pub fn timed_out(adapter: AdapterId, source_name: impl Into<String>) -> Self {
        Self::error(adapter, source_name, "timed out")
    }

    pub fn with_evidence(mut self, text: impl Into<String>) -> Self {
        self.evidence_text = text.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.raw_latency = latency;
        self
    }
}

/// Tally of verification outcomes in an evidence set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub matches: usize,
    pub mismatches: usize,
    pub no_data: usize,
    pub errors: usize,
}

impl VoteCounts {
    pub fn informative(&self) -> usize {
        self.matches + self.mismatches
    }

    pub fn total(&self) -> usize {
        self.informative() + self.no_data + self.errors
    }
}

/// All evidence gathered for one claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceSet {
    items: Vec<EvidenceItem>,
}

impl EvidenceSet {
    pub fn new(items: Vec<EvidenceItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvidenceItem> {
        self.items.iter()
    }

    pub fn counts(&self) -> VoteCounts {
        let mut counts = VoteCounts::default();
        for item in &self.items {
            match item.verification {
                Verification::Match => counts.matches += 1,
                Verification::Mismatch => counts.mismatches += 1,
                Verification::NoData => counts.no_data += 1,
                Verification::Error => counts.errors += 1,
            }
        }
        counts
    }

    /// Reorder items by adapter precedence.
    ///
    /// The sort key covers every field that can differ between items, so any
    /// permutation of the same items yields the same sequence.
    pub fn into_precedence_order(mut self) -> Self {
        self.items.sort_by(|a, b| {
            a.adapter
                .cmp(&b.adapter)
                .then_with(|| a.source_name.cmp(&b.source_name))
                .then_with(|| a.verification.as_str().cmp(b.verification.as_str()))
                .then_with(|| a.evidence_text.cmp(&b.evidence_text))
                .then_with(|| a.source_url.cmp(&b.source_url))
                .then_with(|| match (a.numeric_value, b.numeric_value) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (x, y) => x.is_some().cmp(&y.is_some()),
                })
                .then_with(|| a.raw_latency.cmp(&b.raw_latency))
        });
        self
    }

    pub fn into_items(self) -> Vec<EvidenceItem> {
        self.items
    }
}

impl FromIterator<EvidenceItem> for EvidenceSet {
    fn from_iter<I: IntoIterator<Item = EvidenceItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EvidenceSet {
    type Item = &'a EvidenceItem;
    type IntoIter = std::slice::Iter<'a, EvidenceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
