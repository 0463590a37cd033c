//! Claims as handed over by the extraction step
//!
//! Extraction (out of this crate) yields `{text, category}` pairs per
//! transcript. This module turns them into immutable [`Claim`] values with a
//! resolved [`ClaimCategory`] and an opaque pointer back into the transcript.
//!
//! # Example
//!
//! ```rust
//! use deepscope_core::claim::{Claim, ClaimCategory, ExtractedClaim, SourceLocator};
//!
//! let extracted = ExtractedClaim::new("Apple reported Q3 revenue of $85.8 billion", None);
//! let claim = Claim::from_extracted(extracted, SourceLocator::new("video-42#3"));
//! assert_eq!(claim.category(), ClaimCategory::CompanyFinancials);
//! ```

mod category;
mod types;

pub use category::ClaimCategory;
pub use types::{Claim, ExtractedClaim, SourceLocator};
