//! Evidence produced by source adapters
//!
//! One [`EvidenceItem`] per (claim, adapter); an [`EvidenceSet`] gathers the
//! items for one claim, with exactly one entry per routed adapter.

mod types;

pub use types::{AdapterId, EvidenceItem, EvidenceSet, Verification, VoteCounts};
