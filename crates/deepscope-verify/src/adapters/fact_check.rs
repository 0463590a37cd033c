//! Published fact-check search (Google Fact Check Tools `claims:search`)
//!
//! Passes the claim text straight to the search, reads every returned
//! review's textual rating and lets the majority of interpretable ratings
//! decide.

use async_trait::async_trait;
use deepscope_core::evidence::AdapterId;
use deepscope_core::Claim;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use super::http::{self, clip};
use crate::adapter::{Classification, EvidenceAdapter, Finding};
use crate::error::AdapterError;
use crate::gate::{GateConfig, SourceGate};

pub const SOURCE_NAME: &str = "Google Fact Check Tools";
pub const DEFAULT_ENDPOINT: &str = "https://factchecktools.googleapis.com/v1alpha1/claims:search";

// Negative phrases first: "incorrect" and "untrue" contain positive words.
const FALSE_INDICATORS: &[&str] = &[
    "incorrect",
    "false",
    "untrue",
    "misleading",
    "wrong",
    "inaccurate",
    "debunked",
    "no evidence",
    "not true",
    "mostly false",
];

const TRUE_INDICATORS: &[&str] = &[
    "correct",
    "true",
    "accurate",
    "verified",
    "confirmed",
    "supported by evidence",
    "factual",
    "mostly true",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub language_code: String,
    pub gate: GateConfig,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language_code: "en-US".to_string(),
            gate: GateConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    claims: Vec<ClaimEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimEntry {
    #[serde(default)]
    claim_review: Vec<Review>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Review {
    #[serde(default)]
    publisher: Option<Publisher>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    textual_rating: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Publisher {
    #[serde(default)]
    name: String,
}

/// Interpret a fact-checker's textual rating.
pub fn interpret_rating(rating: &str) -> Classification {
    let rating = rating.trim().to_lowercase();
    if rating.is_empty() {
        return Classification::NoData;
    }
    if FALSE_INDICATORS.iter().any(|i| rating.contains(i)) {
        return Classification::Mismatch;
    }
    if TRUE_INDICATORS.iter().any(|i| rating.contains(i)) {
        return Classification::Match;
    }
    Classification::NoData
}

pub struct FactCheckAdapter {
    client: Client,
    config: FactCheckConfig,
    gate: SourceGate,
}

impl FactCheckAdapter {
    pub fn new(client: Client, config: FactCheckConfig) -> Self {
        let gate = SourceGate::new(config.gate);
        Self {
            client,
            config,
            gate,
        }
    }

    fn decide(reviews: &[Review]) -> Finding {
        if reviews.is_empty() {
            return Finding::no_data("no published fact-checks found");
        }

        let rated: Vec<(&Review, Classification)> = reviews
            .iter()
            .map(|r| (r, interpret_rating(&r.textual_rating)))
            .collect();
        let matches = rated
            .iter()
            .filter(|(_, c)| *c == Classification::Match)
            .count();
        let mismatches = rated
            .iter()
            .filter(|(_, c)| *c == Classification::Mismatch)
            .count();

        let classification = match matches.cmp(&mismatches) {
            std::cmp::Ordering::Greater => Classification::Match,
            std::cmp::Ordering::Less => Classification::Mismatch,
            std::cmp::Ordering::Equal => Classification::NoData,
        };

        let summary: Vec<String> = rated
            .iter()
            .take(5)
            .map(|(r, _)| {
                let publisher = r
                    .publisher
                    .as_ref()
                    .map(|p| p.name.as_str())
                    .filter(|n| !n.is_empty())
                    .unwrap_or("unknown publisher");
                format!("{} rated it '{}'", publisher, r.textual_rating.trim())
            })
            .collect();
        let text = format!(
            "{} review(s), {} supporting, {} refuting: {}",
            reviews.len(),
            matches,
            mismatches,
            summary.join("; ")
        );

        let url = rated
            .iter()
            .find(|(_, c)| *c == classification)
            .or_else(|| rated.first())
            .map(|(r, _)| r.url.clone())
            .unwrap_or_default();

        Finding::new(classification, clip(&text, 500)).with_url(url)
    }
}

/// 403 from this API signals quota exhaustion rather than bad credentials
fn classify_status(status: u16, retry_after: Option<Duration>, body: &str) -> AdapterError {
    match status {
        403 | 429 => AdapterError::RateLimited { retry_after },
        _ => http::classify_status(status, retry_after, body),
    }
}

#[async_trait]
impl EvidenceAdapter for FactCheckAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::FactCheckSearch
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn verify(&self, claim: &Claim, deadline: Instant) -> Result<Finding, AdapterError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AdapterError::NotConfigured("GOOGLE_API_KEY is not set".into()))?;

        let _permit = self.gate.acquire().await?;
        let request = self.client.get(&self.config.endpoint).query(&[
            ("key", api_key),
            ("query", claim.text()),
            ("languageCode", self.config.language_code.as_str()),
        ]);
        let response = http::send(request, deadline, classify_status).await?;
        let body: SearchResponse = http::read_json(response).await?;

        let reviews: Vec<Review> = body
            .claims
            .into_iter()
            .flat_map(|c| c.claim_review)
            .collect();
        Ok(Self::decide(&reviews))
    }
}
