//! # DeepScope Shared Rust Library
//!
//! Shared infrastructure for the DeepScope crates:
//! - **error**: Error type for the process boundary (claim files, configuration, report output)
//! - **tracing**: stderr logging setup and the segment prefixes pipeline logs lead with
//!
//! ## Usage
//!
//! ```rust,ignore
//! deepscope::tracing::init_with_filter("debug");
//! let config = VerifyConfig::from_file(path).map_err(deepscope::Error::config)?;
//! ```

pub mod error;
pub mod tracing;

pub use error::{Error, Result};
