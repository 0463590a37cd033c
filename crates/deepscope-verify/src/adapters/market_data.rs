//! Market-data quotes (Alpha Vantage `GLOBAL_QUOTE`)
//!
//! Compares a claimed share price, or a claimed percent move, with the
//! latest quote for the ticker the claim names. Claims about an earlier
//! period cannot be checked against the latest quote and yield no data.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use deepscope_core::evidence::AdapterId;
use deepscope_core::figures::{self, Figure, FigureKind, Tolerance};
use deepscope_core::symbols::extract_ticker;
use deepscope_core::Claim;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use super::filings::Period;
use super::http;
use crate::adapter::{Classification, EvidenceAdapter, Finding};
use crate::error::AdapterError;
use crate::gate::{GateConfig, SourceGate};

pub const SOURCE_NAME: &str = "Alpha Vantage";
pub const DEFAULT_ENDPOINT: &str = "https://www.alphavantage.co/query";

const PRICE_FIELD: &str = "05. price";
const CHANGE_PERCENT_FIELD: &str = "10. change percent";

// Claimed moves are rounded to a tenth of a point more often than not
const PERCENT_POINT_FLOOR: f64 = 0.05;

lazy_static! {
    static ref RELATIVE_PAST: Regex = Regex::new(
        r"(?i)\b(?:last|previous|prior)\s+(?:year|quarter|month)\b|\b(?:years?|months?)\s+ago\b"
    )
    .expect("valid pattern");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub gate: GateConfig,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            // Free tier allows a handful of calls per minute
            gate: GateConfig {
                max_in_flight: 1,
                min_interval_ms: 1_000,
            },
        }
    }
}

pub struct MarketDataAdapter {
    client: Client,
    config: MarketDataConfig,
    tolerance: Tolerance,
    gate: SourceGate,
}

impl MarketDataAdapter {
    pub fn new(client: Client, config: MarketDataConfig, tolerance: Tolerance) -> Self {
        let gate = SourceGate::new(config.gate);
        Self {
            client,
            config,
            tolerance,
            gate,
        }
    }

    fn public_url(&self, ticker: &str) -> String {
        format!("{}?function=GLOBAL_QUOTE&symbol={}", self.config.endpoint, ticker)
    }
}

/// Pull the quote object out of a response body.
///
/// Throttling and error notices arrive as 200 responses with a
/// `Note`/`Information` or `Error Message` field instead of a quote.
fn quote_fields(body: Value) -> Result<HashMap<String, String>, AdapterError> {
    if body.get("Note").is_some() || body.get("Information").is_some() {
        return Err(AdapterError::RateLimited { retry_after: None });
    }
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(AdapterError::BadRequest(message.to_string()));
    }

    let quote = body
        .get("Global Quote")
        .ok_or_else(|| AdapterError::Parse("response has no 'Global Quote'".into()))?;
    serde_json::from_value(quote.clone()).map_err(|e| AdapterError::Parse(e.to_string()))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().trim_end_matches('%').trim().parse().ok()
}

/// Why a claim is about some period other than today's, if it is.
///
/// A named quarter or fiscal year, a year other than `today`'s, or a phrase
/// like "last year" all point away from the latest quote.
fn past_period(text: &str, today: NaiveDate) -> Option<String> {
    if let Some(period) = Period::detect(text) {
        return Some(format!(
            "claim refers to {} {}",
            period.fiscal_period, period.fiscal_year
        ));
    }
    let year = today.year() as f64;
    if let Some(named) = figures::extract(text)
        .into_iter()
        .find(|f| f.is_probable_year() && f.value != year)
    {
        return Some(format!("claim refers to {}", named.value));
    }
    RELATIVE_PAST
        .find(text)
        .map(|m| format!("claim refers to {}", m.as_str()))
}

/// Classify a quote against the claimed figure.
fn judge_quote(
    ticker: &str,
    figure: Figure,
    quote: &HashMap<String, String>,
    tolerance: Tolerance,
) -> Finding {
    if quote.is_empty() {
        return Finding::no_data(format!("no quote available for {ticker}"));
    }

    let (field, label, tolerance) = match figure.kind {
        FigureKind::Percent => (
            CHANGE_PERCENT_FIELD,
            "change",
            tolerance.with_absolute(tolerance.absolute.max(PERCENT_POINT_FLOOR)),
        ),
        _ => (PRICE_FIELD, "price", tolerance),
    };

    let Some(reported) = quote.get(field).and_then(|raw| parse_number(raw)) else {
        return Finding::no_data(format!("quote for {ticker} has no {label}"));
    };

    let classification = figures::compare(figure.value, reported, tolerance);
    let unit = if figure.kind == FigureKind::Percent { "%" } else { "" };
    Finding::new(
        Classification::compared(classification),
        format!(
            "{ticker} latest {label} {reported:.2}{unit} (claimed {:.2}{unit}, {:+.2}%)",
            figure.value,
            figures::relative_delta(figure.value, reported) * 100.0
        ),
    )
    .with_value(reported)
}

#[async_trait]
impl EvidenceAdapter for MarketDataAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::MarketData
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn verify(&self, claim: &Claim, deadline: Instant) -> Result<Finding, AdapterError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AdapterError::NotConfigured("ALPHA_VANTAGE_API_KEY is not set".into())
        })?;

        let Some(ticker) = extract_ticker(claim.text()) else {
            return Ok(Finding::no_data("no ticker symbol in claim"));
        };
        if let Some(reason) = past_period(claim.text(), Utc::now().date_naive()) {
            return Ok(Finding::no_data(format!("{reason}, not the latest quote")));
        }
        let figure = match figures::primary_figure(claim.text()) {
            Some(f) if matches!(f.kind, FigureKind::Celsius | FigureKind::Fahrenheit) => None,
            // Scaled amounts are market caps or volumes, not quote fields
            Some(f) if f.scaled => None,
            other => other,
        };
        let Some(figure) = figure else {
            return Ok(Finding::no_data("no price or percent figure in claim"));
        };

        let _permit = self.gate.acquire().await?;
        let request = self.client.get(&self.config.endpoint).query(&[
            ("function", "GLOBAL_QUOTE"),
            ("symbol", ticker.as_str()),
            ("apikey", api_key),
        ]);
        let response = http::send(request, deadline, http::classify_status).await?;
        let body: Value = http::read_json(response).await?;
        let quote = quote_fields(body)?;

        Ok(judge_quote(&ticker, figure, &quote, self.tolerance).with_url(self.public_url(&ticker)))
    }
}
