//! DeepScope Core Engine
//!
//! The synchronous kernel of the fact-checking pipeline. Everything here is
//! pure: given the same claim and evidence it produces the same verdict, with
//! no I/O and no clocks.
//!
//! # Modules
//!
//! - `claim` - Claims as handed over by extraction, with category resolution
//! - `evidence` - Per-source evidence items and evidence sets
//! - `figures` - Numeric figure extraction and tolerance comparison
//! - `router` - Category → adapter routing table
//! - `consensus` - Verdict, confidence and explanation from an evidence set
//! - `assemble` - Validation and conversion to the persisted report shape
//! - `lifecycle` - Claim check states
//! - `summary` - Transcript-level roll-up
//! - `symbols` - Ticker extraction for market and filings lookups
//!
//! # Example
//!
//! ```rust
//! use deepscope_core::{assemble, Claim, ClaimCategory, ConsensusAggregator, SourceLocator};
//! use deepscope_core::evidence::{AdapterId, EvidenceItem, EvidenceSet, Verification};
//!
//! let claim = Claim::new("Water boils at 105°C at sea level", ClaimCategory::Other, SourceLocator::detached());
//! let evidence = EvidenceSet::new(vec![
//!     EvidenceItem::new(AdapterId::ReferenceTable, "Reference figures", Verification::Mismatch)
//!         .with_value(100.0),
//! ]);
//!
//! let record = ConsensusAggregator::default().aggregate(&claim, evidence);
//! let report = assemble(&record).unwrap();
//! assert_eq!(report.result.to_string(), "false");
//! ```

pub mod assemble;
pub mod claim;
pub mod consensus;
pub mod error;
pub mod evidence;
pub mod figures;
pub mod lifecycle;
pub mod router;
pub mod summary;
pub mod symbols;

// Re-export main types at crate root
pub use assemble::{assemble, CheckedSource, ClaimReport};
pub use claim::{Claim, ClaimCategory, ExtractedClaim, SourceLocator};
pub use consensus::{ConsensusAggregator, ConsensusPolicy, VerdictRecord, VerdictResult};
pub use error::{ConfigError, LifecycleError, MalformedRecord};
pub use evidence::{AdapterId, EvidenceItem, EvidenceSet, Verification, VoteCounts};
pub use figures::{Figure, FigureKind};
pub use lifecycle::ClaimState;
pub use router::SourceRouter;
pub use summary::{TranscriptSummary, TranscriptVerdict};
