//! Engine configuration
//!
//! Loaded from a JSON file; every field has a default, so `{}` is a valid
//! configuration. Credentials are normally supplied through the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `GOOGLE_API_KEY` | `sources.fact_check.api_key` |
//! | `OPENAI_API_KEY` | `sources.llm.api_key` |
//! | `ALPHA_VANTAGE_API_KEY` | `sources.market_data.api_key` |
//! | `SEC_USER_AGENT` | `sources.filings.user_agent` |

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use deepscope_core::figures::{Tolerance, DEFAULT_TOLERANCE};
use deepscope_core::ConsensusPolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::EvidenceAdapter;
use crate::adapters::reference::{builtin_figures, DEFAULT_ABSOLUTE_TOLERANCE};
use crate::adapters::{
    http, FactCheckAdapter, FactCheckConfig, FilingsAdapter, FilingsConfig, LlmAdapter,
    LlmConfig, MarketDataAdapter, MarketDataConfig, ReferenceFigure, ReferenceTableAdapter,
};
use crate::error::VerifyError;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub fact_check: FactCheckConfig,
    pub llm: LlmConfig,
    pub market_data: MarketDataConfig,
    pub filings: FilingsConfig,
    /// Upper bound on any single HTTP request, below the attempt timeout
    pub request_timeout_ms: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            fact_check: FactCheckConfig::default(),
            llm: LlmConfig::default(),
            market_data: MarketDataConfig::default(),
            filings: FilingsConfig::default(),
            request_timeout_ms: 8_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub retry: RetryPolicy,
    pub consensus: ConsensusPolicy,
    /// Relative tolerance for numeric comparisons
    pub numeric_tolerance: f64,
    /// Absolute floor for reference-table comparisons, in each figure's unit
    pub reference_absolute_tolerance: f64,
    /// Claims checked at once within a transcript
    pub claim_concurrency: usize,
    pub sources: SourcesConfig,
    /// Extra figures for the reference table, consulted before the built-ins
    pub reference_figures: Vec<ReferenceFigure>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            consensus: ConsensusPolicy::default(),
            numeric_tolerance: DEFAULT_TOLERANCE,
            reference_absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            claim_concurrency: 4,
            sources: SourcesConfig::default(),
            reference_figures: Vec::new(),
        }
    }
}

impl VerifyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, VerifyError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VerifyError::ConfigFile {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "Loading verification config");
        Self::from_json_str(&json)
    }

    /// Fill credentials from `lookup`; set values win over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            self.sources.fact_check.api_key = Some(key);
        }
        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.sources.llm.api_key = Some(key);
        }
        if let Some(key) = non_empty("ALPHA_VANTAGE_API_KEY") {
            self.sources.market_data.api_key = Some(key);
        }
        if let Some(agent) = non_empty("SEC_USER_AGENT") {
            self.sources.filings.user_agent = Some(agent);
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_env(|name| std::env::var(name).ok());
        self
    }

    pub fn validate(&self) -> Result<(), VerifyError> {
        let invalid = |msg: &str| Err(VerifyError::InvalidValue(msg.to_string()));

        if !self.numeric_tolerance.is_finite() || self.numeric_tolerance < 0.0 {
            return invalid("numeric_tolerance must be a non-negative number");
        }
        let floor = self.reference_absolute_tolerance;
        if !floor.is_finite() || floor < 0.0 {
            return invalid("reference_absolute_tolerance must be a non-negative number");
        }
        if self.sources.request_timeout_ms == 0 {
            return invalid("sources.request_timeout_ms must be positive");
        }
        if self.claim_concurrency == 0 {
            return invalid("claim_concurrency must be at least 1");
        }
        if self.retry.attempt_timeout_ms == 0 || self.retry.claim_ceiling_ms == 0 {
            return invalid("retry timeouts must be positive");
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return invalid("retry.initial_backoff_ms exceeds retry.max_backoff_ms");
        }
        if !self.consensus.conflict_scale.is_finite() || self.consensus.conflict_scale < 0.0 {
            return invalid("consensus.conflict_scale must be a non-negative number");
        }
        if !(0.0..=1.0).contains(&self.consensus.review_threshold) {
            return invalid("consensus.review_threshold must lie in [0, 1]");
        }
        if let Some(figure) = self
            .reference_figures
            .iter()
            .find(|f| f.keywords.is_empty() || !f.value.is_finite())
        {
            return Err(VerifyError::InvalidValue(format!(
                "reference figure '{}' needs keywords and a finite value",
                figure.description
            )));
        }
        Ok(())
    }

    /// Build every built-in adapter over one shared HTTP client.
    ///
    /// Adapters without credentials are still registered; their calls fail
    /// as `not configured` evidence instead of leaving routes uncovered.
    pub fn build_adapters(&self) -> Result<Vec<Arc<dyn EvidenceAdapter>>, VerifyError> {
        let client = http::build_client(Duration::from_millis(self.sources.request_timeout_ms))?;
        let tolerance = Tolerance::relative(self.numeric_tolerance);
        let reference_tolerance = tolerance.with_absolute(self.reference_absolute_tolerance);

        let mut figures = self.reference_figures.clone();
        figures.extend(builtin_figures());

        let adapters: Vec<Arc<dyn EvidenceAdapter>> = vec![
            Arc::new(FilingsAdapter::new(
                client.clone(),
                self.sources.filings.clone(),
                tolerance,
            )) as Arc<dyn EvidenceAdapter>,
            Arc::new(MarketDataAdapter::new(
                client.clone(),
                self.sources.market_data.clone(),
                tolerance,
            )),
            Arc::new(ReferenceTableAdapter::new(figures, reference_tolerance)),
            Arc::new(FactCheckAdapter::new(
                client.clone(),
                self.sources.fact_check.clone(),
            )),
            Arc::new(LlmAdapter::new(client, self.sources.llm.clone())),
        ];
        Ok(adapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_object_is_default() {
        let config = VerifyConfig::from_json_str("{}").unwrap();
        assert_eq!(config, VerifyConfig::default());
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.numeric_tolerance, 0.01);
        assert_eq!(config.reference_absolute_tolerance, 0.5);
    }

    #[test]
    fn test_request_timeout_below_attempt_timeout() {
        let config = VerifyConfig::default();
        assert!(config.sources.request_timeout_ms < config.retry.attempt_timeout_ms);
    }

    #[test]
    fn test_partial_sections() {
        let config = VerifyConfig::from_json_str(
            r#"{"retry": {"max_retries": 5}, "sources": {"llm": {"model": "gpt-4"}}}"#,
        )
        .unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_backoff_ms, 250);
        assert_eq!(config.sources.llm.model, "gpt-4");
        assert_eq!(config.sources.llm.endpoint, crate::adapters::llm::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GOOGLE_API_KEY", "g-key"),
            ("OPENAI_API_KEY", "  "),
            ("SEC_USER_AGENT", "DeepScope ops@example.com"),
        ]
        .into_iter()
        .collect();

        let mut config = VerifyConfig::default();
        config.sources.llm.api_key = Some("from-file".into());
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.sources.fact_check.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.sources.llm.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.sources.market_data.api_key, None);
        assert_eq!(
            config.sources.filings.user_agent.as_deref(),
            Some("DeepScope ops@example.com")
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            VerifyConfig::from_json_str(r#"{"claim_concurrency": 0}"#),
            Err(VerifyError::InvalidValue(_))
        ));
        assert!(matches!(
            VerifyConfig::from_json_str(r#"{"consensus": {"review_threshold": 1.5}}"#),
            Err(VerifyError::InvalidValue(_))
        ));
        assert!(matches!(
            VerifyConfig::from_json_str(r#"{"numeric_tolerance": "wide"}"#),
            Err(VerifyError::ConfigParse(_))
        ));
        assert!(matches!(
            VerifyConfig::from_json_str(r#"{"reference_absolute_tolerance": -1}"#),
            Err(VerifyError::InvalidValue(_))
        ));
    }

    #[tokio::test]
    async fn test_builds_every_adapter() {
        let adapters = VerifyConfig::default().build_adapters().unwrap();
        let ids: Vec<_> = adapters.iter().map(|a| a.id()).collect();
        assert_eq!(ids, deepscope_core::AdapterId::ALL.to_vec());
    }
}
