//! Errors surfaced at the DeepScope process boundary.
//!
//! Engine crates keep their own typed errors; a binary funnels them into
//! this one when reading claim files, loading configuration or writing
//! reports.

use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Claim file or report output could not be read or written
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Claim file is not valid JSON, or a report failed to encode
    #[error("malformed json: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded, or the engine rejected it
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn config(err: impl Display) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_message() {
        let err = Error::config("claim_concurrency must be at least 1");
        assert_eq!(
            err.to_string(),
            "configuration error: claim_concurrency must be at least 1"
        );
    }

    #[test]
    fn malformed_claim_file_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("[{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().starts_with("malformed json:"));
    }
}
