//! Built-in evidence source adapters
//!
//! | Adapter | Source |
//! |---|---|
//! | [`FilingsAdapter`] | SEC EDGAR XBRL company concepts |
//! | [`MarketDataAdapter`] | Alpha Vantage global quotes |
//! | [`ReferenceTableAdapter`] | Curated reference figures (offline) |
//! | [`FactCheckAdapter`] | Google Fact Check Tools search |
//! | [`LlmAdapter`] | OpenAI-compatible chat completions |

pub mod fact_check;
pub mod filings;
pub(crate) mod http;
pub mod llm;
pub mod market_data;
pub mod reference;

pub use fact_check::{FactCheckAdapter, FactCheckConfig};
pub use filings::{FilingsAdapter, FilingsConfig};
pub use llm::{LlmAdapter, LlmConfig};
pub use market_data::{MarketDataAdapter, MarketDataConfig};
pub use reference::{ReferenceFigure, ReferenceTableAdapter};
