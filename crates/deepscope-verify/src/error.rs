//! Verification error types

use std::time::Duration;

use deepscope_core::{ConfigError, LifecycleError, MalformedRecord};
use thiserror::Error;

/// Failure of a single adapter call.
///
/// Never crosses the orchestrator: every variant ends up as an `Error`
/// evidence item once retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Attempt exceeded its deadline
    #[error("timed out")]
    Timeout,

    /// Source signalled throttling
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// Network-level failure (connect, reset, DNS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Source answered with a server error
    #[error("upstream error: HTTP {0}")]
    Upstream(u16),

    /// Credentials rejected
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Source rejected the query itself
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Response could not be understood
    #[error("unparseable response: {0}")]
    Parse(String),

    /// Adapter lacks the credentials or settings it needs
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Adapter panicked mid-call
    #[error("adapter panicked")]
    Panicked,
}

impl AdapterError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited { .. } | Self::Transport(_) | Self::Upstream(_)
        )
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail: String = body.trim().chars().take(200).collect();
        match status {
            429 => Self::RateLimited { retry_after: None },
            401 | 403 => Self::Auth(format!("HTTP {status}")),
            500..=599 => Self::Upstream(status),
            _ => Self::BadRequest(format!("HTTP {status}: {detail}")),
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), "")
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors building or configuring the verification engine
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Routing table does not cover the registered adapters
    #[error(transparent)]
    Routing(#[from] ConfigError),

    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Why a single claim check ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error(transparent)]
    Routing(#[from] ConfigError),

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
