//! LLM reasoning check (OpenAI-compatible chat completions)
//!
//! The model is asked for a JSON verdict object. Whatever comes back is
//! coerced into a [`Classification`] by [`parse_verdict`] before it becomes
//! evidence; free text never reaches consensus.

use async_trait::async_trait;
use deepscope_core::evidence::AdapterId;
use deepscope_core::Claim;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::Instant;

use super::http::{self, clip};
use crate::adapter::{Classification, EvidenceAdapter, Finding};
use crate::error::AdapterError;
use crate::gate::{GateConfig, SourceGate};

pub const SOURCE_NAME: &str = "LLM reasoning";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a reliable fact-checker.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub gate: GateConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            gate: GateConfig {
                max_in_flight: 2,
                min_interval_ms: 0,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// The verdict object the model is asked to produce
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelVerdict {
    verdict: Value,
    confidence: Option<f64>,
    explanation: String,
    reference_links: Vec<String>,
}

fn prompt(claim: &str) -> String {
    format!(
        "Evaluate the following claim for its truthfulness. Return your response as a JSON \
         object with keys 'verdict' ('true', 'false' or 'uncertain'), 'confidence' (0 to 1), \
         'explanation', and 'reference_links' (array of URLs). Claim: {claim}"
    )
}

/// Map a model verdict word onto a classification.
fn coerce_verdict(verdict: &Value) -> Classification {
    let word = match verdict {
        Value::Bool(true) => return Classification::Match,
        Value::Bool(false) => return Classification::Mismatch,
        Value::String(s) => s.trim().to_lowercase(),
        _ => return Classification::NoData,
    };

    match word.as_str() {
        "true" | "correct" | "accurate" | "supported" | "confirmed" | "mostly true" | "match" => {
            Classification::Match
        }
        "false" | "incorrect" | "inaccurate" | "refuted" | "unsupported" | "mostly false"
        | "mismatch" => Classification::Mismatch,
        _ => Classification::NoData,
    }
}

/// Strip a surrounding markdown code fence, if any
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop an info string such as `json`
    let body = match inner.find('\n') {
        Some(newline) if !inner[..newline].trim_start().starts_with('{') => &inner[newline + 1..],
        _ => inner,
    };
    body.trim()
}

/// Coerce raw model output into a finding.
///
/// Output that is not a verdict object is `NoData`, with the raw text
/// clipped into the evidence.
pub fn parse_verdict(content: &str) -> Finding {
    let body = strip_fence(content);
    let parsed = serde_json::from_str::<ModelVerdict>(body).or_else(|_| {
        // Tolerate prose around a single JSON object
        match (body.find('{'), body.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str::<ModelVerdict>(&body[start..=end])
            }
            _ => serde_json::from_str::<ModelVerdict>(body),
        }
    });

    let verdict = match parsed {
        Ok(verdict) => verdict,
        Err(_) => {
            return Finding::no_data(format!(
                "unparseable model output: {}",
                clip(content, 200)
            ))
        }
    };

    let classification = coerce_verdict(&verdict.verdict);
    let mut text = clip(&verdict.explanation, 400);
    if let Some(confidence) = verdict.confidence.filter(|c| c.is_finite()) {
        if text.is_empty() {
            text = format!("model confidence {:.2}", confidence.clamp(0.0, 1.0));
        } else {
            text = format!("{} (model confidence {:.2})", text, confidence.clamp(0.0, 1.0));
        }
    }
    if text.is_empty() {
        text = "model gave no explanation".to_string();
    }

    let mut finding = Finding::new(classification, text);
    if let Some(link) = verdict.reference_links.into_iter().find(|l| !l.trim().is_empty()) {
        finding = finding.with_url(link.trim());
    }
    finding
}

pub struct LlmAdapter {
    client: Client,
    config: LlmConfig,
    gate: SourceGate,
}

impl LlmAdapter {
    pub fn new(client: Client, config: LlmConfig) -> Self {
        let gate = SourceGate::new(config.gate);
        Self {
            client,
            config,
            gate,
        }
    }
}

#[async_trait]
impl EvidenceAdapter for LlmAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::LlmReasoning
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn verify(&self, claim: &Claim, deadline: Instant) -> Result<Finding, AdapterError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AdapterError::NotConfigured("OPENAI_API_KEY is not set".into()))?;

        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt(claim.text()) },
            ],
        });

        let _permit = self.gate.acquire().await?;
        let request = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body);
        let response = http::send(request, deadline, http::classify_status).await?;
        let completion: CompletionResponse = http::read_json(response).await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AdapterError::Parse("completion has no message content".into()))?;

        Ok(parse_verdict(&content))
    }
}
