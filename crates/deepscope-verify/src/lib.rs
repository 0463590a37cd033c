//! DeepScope verification engine
//!
//! The async half of the fact-checking pipeline: evidence source adapters,
//! concurrent fan-out with per-attempt timeouts and retries, and the claim
//! pipeline that hands evidence to the pure consensus kernel in
//! `deepscope-core`.
//!
//! # Modules
//!
//! - `adapter` - Evidence source contract
//! - `adapters` - Built-in sources (filings, market data, reference table, fact-check search, LLM)
//! - `gate` - Per-source request gates
//! - `retry` - Retry state machine for one adapter call
//! - `orchestrator` - Fan-out over routed adapters for one claim
//! - `pipeline` - Claim lifecycle and transcript batches
//! - `config` - Engine configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use deepscope_core::{Claim, ClaimCategory, SourceLocator};
//! use deepscope_verify::{FactCheckPipeline, VerifyConfig};
//!
//! # async fn run() -> Result<(), deepscope_verify::VerifyError> {
//! let config = VerifyConfig::default().with_env_overrides();
//! let pipeline = FactCheckPipeline::from_config(&config)?;
//!
//! let claim = Claim::new("Water boils at 105°C at sea level", ClaimCategory::Other, SourceLocator::detached());
//! let outcome = pipeline.check_claim(claim).await;
//! println!("{:?}", outcome.report.map(|r| r.result));
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod pipeline;
pub mod retry;

pub use adapter::{Classification, EvidenceAdapter, Finding};
pub use config::VerifyConfig;
pub use error::{AdapterError, CheckError, VerifyError};
pub use gate::{GateConfig, SourceGate};
pub use orchestrator::Orchestrator;
pub use pipeline::{ClaimOutcome, FactCheckPipeline, TranscriptOutcome};
pub use retry::RetryPolicy;
