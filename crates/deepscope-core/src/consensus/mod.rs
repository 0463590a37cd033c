//! Consensus aggregation
//!
//! Collapses an [`EvidenceSet`](crate::evidence::EvidenceSet) into one
//! [`VerdictRecord`]:
//!
//! - **True**: every source with relevant data confirms the claim
//! - **False**: every source with relevant data contradicts it
//! - **Conflicting**: informative sources split, including an exact 50/50 tie
//! - **Unverified**: no source had relevant data (only no-data or errors)
//!
//! Aggregation is synchronous and side-effect free. It depends only on the
//! multiset of evidence, never on arrival order: the same evidence in any
//! order yields the same record, with evidence listed in adapter precedence
//! order.
//!
//! # Example
//!
//! ```rust
//! use deepscope_core::claim::{Claim, ClaimCategory, SourceLocator};
//! use deepscope_core::consensus::{ConsensusAggregator, VerdictResult};
//! use deepscope_core::evidence::{AdapterId, EvidenceItem, EvidenceSet, Verification};
//!
//! let claim = Claim::new("GDP grew 2.5% in 2023", ClaimCategory::Macroeconomic, SourceLocator::detached());
//! let evidence = EvidenceSet::new(vec![
//!     EvidenceItem::new(AdapterId::ReferenceTable, "Reference figures", Verification::Match),
//!     EvidenceItem::new(AdapterId::FactCheckSearch, "Fact checks", Verification::NoData),
//! ]);
//!
//! let record = ConsensusAggregator::default().aggregate(&claim, evidence);
//! assert_eq!(record.result(), VerdictResult::True);
//! assert_eq!(record.confidence(), 1.0);
//! ```

mod aggregator;
mod explain;
mod types;

pub use aggregator::ConsensusAggregator;
pub use types::{ConsensusPolicy, VerdictRecord, VerdictResult};
