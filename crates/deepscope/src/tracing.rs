//! Logging setup and segment prefixes for DeepScope log lines.
//!
//! Verdict reports own stdout, so every log line goes to stderr.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset or unparseable.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Segment markers that lead claim-pipeline log messages.
pub mod prefix {
    /// Evidence fan-out to external sources
    pub const VERIFY: &str = "⇉";
    /// Consensus and verdict computation
    pub const CONSENSUS: &str = "⚖";
    /// Hand-off to the persistence boundary
    pub const PERSIST: &str = "⊔";
}
