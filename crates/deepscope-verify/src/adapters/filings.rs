//! Regulatory filings (SEC EDGAR XBRL company concepts)
//!
//! Resolves the claim's ticker to a CIK through the company-tickers index,
//! maps the metric the claim talks about to US-GAAP concepts, and compares
//! the reported value for the claimed period with the claimed figure.

use std::collections::HashMap;

use async_trait::async_trait;
use deepscope_core::evidence::AdapterId;
use deepscope_core::figures::{self, Figure, FigureKind, Tolerance};
use deepscope_core::symbols::extract_ticker;
use deepscope_core::Claim;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

use super::http;
use crate::adapter::{Classification, EvidenceAdapter, Finding};
use crate::error::AdapterError;
use crate::gate::{GateConfig, SourceGate};

pub const SOURCE_NAME: &str = "SEC EDGAR";
pub const DEFAULT_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
pub const DEFAULT_CONCEPT_BASE_URL: &str = "https://data.sec.gov/api/xbrl/companyconcept";

lazy_static! {
    static ref QUARTER: Regex =
        Regex::new(r"(?i)\bQ([1-4])\s*(?:FY)?\s*'?(\d{4})\b").expect("valid pattern");
    static ref FISCAL_YEAR: Regex =
        Regex::new(r"(?i)\b(?:FY|fiscal(?:\s+year)?)\s*'?(\d{4})\b").expect("valid pattern");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingsConfig {
    /// EDGAR requires a descriptive User-Agent with contact details
    pub user_agent: Option<String>,
    pub tickers_url: String,
    pub concept_base_url: String,
    pub gate: GateConfig,
}

impl Default for FilingsConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            tickers_url: DEFAULT_TICKERS_URL.to_string(),
            concept_base_url: DEFAULT_CONCEPT_BASE_URL.to_string(),
            // EDGAR fair-access limit is 10 requests per second
            gate: GateConfig {
                max_in_flight: 4,
                min_interval_ms: 100,
            },
        }
    }
}

/// Reported metric a claim can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Revenue,
    NetIncome,
    EarningsPerShare,
    Cash,
    Assets,
}

impl Metric {
    /// Find the metric a claim talks about.
    pub fn detect(text: &str) -> Option<Self> {
        // Pad and strip punctuation so keywords only match whole words
        let mut words = String::with_capacity(text.len() + 2);
        words.push(' ');
        for c in text.chars() {
            if c.is_alphanumeric() {
                words.extend(c.to_lowercase());
            } else {
                words.push(' ');
            }
        }
        words.push(' ');
        let has = |keys: &[&str]| keys.iter().any(|k| words.contains(&format!(" {k} ")));

        if has(&["earnings per share", "eps"]) {
            Some(Self::EarningsPerShare)
        } else if has(&["net income", "net loss", "profit", "profits", "earnings"]) {
            Some(Self::NetIncome)
        } else if has(&["revenue", "revenues", "sales"]) {
            Some(Self::Revenue)
        } else if has(&["cash"]) {
            Some(Self::Cash)
        } else if has(&["assets"]) {
            Some(Self::Assets)
        } else {
            None
        }
    }

    /// US-GAAP concepts tried in order
    pub fn concepts(&self) -> &'static [&'static str] {
        match self {
            Self::Revenue => &[
                "Revenues",
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                "SalesRevenueNet",
            ],
            Self::NetIncome => &["NetIncomeLoss"],
            Self::EarningsPerShare => &["EarningsPerShareDiluted", "EarningsPerShareBasic"],
            Self::Cash => &["CashAndCashEquivalentsAtCarryingValue"],
            Self::Assets => &["Assets"],
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::EarningsPerShare => "USD/shares",
            _ => "USD",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::NetIncome => "net income",
            Self::EarningsPerShare => "EPS",
            Self::Cash => "cash and equivalents",
            Self::Assets => "total assets",
        }
    }
}

/// Fiscal period named in a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub fiscal_year: i32,
    /// `FY`, `Q1`..`Q4`
    pub fiscal_period: String,
}

impl Period {
    pub fn detect(text: &str) -> Option<Self> {
        if let Some(caps) = QUARTER.captures(text) {
            return Some(Self {
                fiscal_year: caps[2].parse().ok()?,
                fiscal_period: format!("Q{}", &caps[1]),
            });
        }
        let caps = FISCAL_YEAR.captures(text)?;
        Some(Self {
            fiscal_year: caps[1].parse().ok()?,
            fiscal_period: "FY".to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    cik_str: u64,
    ticker: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConceptResponse {
    #[serde(default)]
    units: HashMap<String, Vec<Fact>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Fact {
    end: String,
    val: f64,
    #[serde(default)]
    fy: Option<i32>,
    #[serde(default)]
    fp: Option<String>,
    #[serde(default)]
    form: String,
}

/// Pick the fact to compare against.
///
/// With a period: the matching fiscal year and period, latest period end.
/// Without: the most recent annual (10-K) figure.
fn select_fact<'a>(facts: &'a [Fact], period: Option<&Period>) -> Option<&'a Fact> {
    match period {
        Some(period) => facts
            .iter()
            .filter(|f| {
                f.fy == Some(period.fiscal_year)
                    && f.fp.as_deref() == Some(period.fiscal_period.as_str())
            })
            .max_by(|a, b| a.end.cmp(&b.end)),
        None => facts
            .iter()
            .filter(|f| f.form.starts_with("10-K"))
            .max_by(|a, b| a.end.cmp(&b.end)),
    }
}

fn judge_fact(
    ticker: &str,
    metric: Metric,
    figure: Figure,
    fact: &Fact,
    tolerance: Tolerance,
) -> Finding {
    let verification = figures::compare(figure.value, fact.val, tolerance);
    let period = match (&fact.fy, &fact.fp) {
        (Some(fy), Some(fp)) => format!("{fp} {fy}"),
        _ => format!("period ending {}", fact.end),
    };
    Finding::new(
        Classification::compared(verification),
        format!(
            "{ticker} reported {} of {} for {} in {} (claimed {}, {:+.2}%)",
            metric.label(),
            format_amount(fact.val),
            period,
            fact.form,
            format_amount(figure.value),
            figures::relative_delta(figure.value, fact.val) * 100.0
        ),
    )
    .with_value(fact.val)
}

fn format_amount(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{:.2}", value)
    }
}

pub struct FilingsAdapter {
    client: Client,
    config: FilingsConfig,
    tolerance: Tolerance,
    gate: SourceGate,
    ciks: OnceCell<HashMap<String, u64>>,
}

impl FilingsAdapter {
    pub fn new(client: Client, config: FilingsConfig, tolerance: Tolerance) -> Self {
        let gate = SourceGate::new(config.gate);
        Self {
            client,
            config,
            tolerance,
            gate,
            ciks: OnceCell::new(),
        }
    }

    async fn cik_index(
        &self,
        user_agent: &str,
        deadline: Instant,
    ) -> Result<&HashMap<String, u64>, AdapterError> {
        self.ciks
            .get_or_try_init(|| async move {
                let _permit = self.gate.acquire().await?;
                let request = self
                    .client
                    .get(&self.config.tickers_url)
                    .header(USER_AGENT, user_agent);
                let response = http::send(request, deadline, http::classify_status).await?;
                let entries: HashMap<String, TickerEntry> = http::read_json(response).await?;
                debug!(companies = entries.len(), "Loaded EDGAR ticker index");
                Ok(entries
                    .into_values()
                    .map(|e| (e.ticker.to_uppercase(), e.cik_str))
                    .collect())
            })
            .await
    }

    fn concept_url(&self, cik: u64, concept: &str) -> String {
        format!(
            "{}/CIK{:010}/us-gaap/{}.json",
            self.config.concept_base_url.trim_end_matches('/'),
            cik,
            concept
        )
    }
}

#[async_trait]
impl EvidenceAdapter for FilingsAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Filings
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn verify(&self, claim: &Claim, deadline: Instant) -> Result<Finding, AdapterError> {
        let user_agent = self
            .config
            .user_agent
            .as_deref()
            .ok_or_else(|| AdapterError::NotConfigured("SEC_USER_AGENT is not set".into()))?;

        let text = claim.text();
        let Some(metric) = Metric::detect(text) else {
            return Ok(Finding::no_data("no reported metric in claim"));
        };
        let Some(ticker) = extract_ticker(text) else {
            return Ok(Finding::no_data("no company identified in claim"));
        };
        let figure = figures::primary_figure(text).filter(|f| {
            matches!(f.kind, FigureKind::Currency | FigureKind::Plain)
        });
        let Some(figure) = figure else {
            return Ok(Finding::no_data(format!("no {} figure in claim", metric.label())));
        };

        let lookup = ticker.replace('.', "-");
        let Some(&cik) = self.cik_index(user_agent, deadline).await?.get(&lookup) else {
            return Ok(Finding::no_data(format!("{ticker} not found in EDGAR")));
        };

        let period = Period::detect(text);
        for concept in metric.concepts() {
            let url = self.concept_url(cik, concept);
            let response = {
                let _permit = self.gate.acquire().await?;
                let request = self.client.get(&url).header(USER_AGENT, user_agent);
                http::send_allow_missing(request, deadline, http::classify_status).await?
            };
            let Some(response) = response else {
                continue;
            };

            let body: ConceptResponse = http::read_json(response).await?;
            let facts = body.units.get(metric.unit()).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(fact) = select_fact(facts, period.as_ref()) {
                return Ok(judge_fact(&ticker, metric, figure, fact, self.tolerance).with_url(url));
            }
        }

        Ok(Finding::no_data(match period {
            Some(p) => format!(
                "no {} filed for {} {} {}",
                metric.label(),
                ticker,
                p.fiscal_period,
                p.fiscal_year
            ),
            None => format!("no annual {} filed for {}", metric.label(), ticker),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(end: &str, val: f64, fy: i32, fp: &str, form: &str) -> Fact {
        Fact {
            end: end.to_string(),
            val,
            fy: Some(fy),
            fp: Some(fp.to_string()),
            form: form.to_string(),
        }
    }

    #[test]
    fn test_metric_detection() {
        assert_eq!(
            Metric::detect("Alphabet's Q1 2024 revenue was $80.5 billion"),
            Some(Metric::Revenue)
        );
        assert_eq!(
            Metric::detect("Apple earnings per share hit $1.53"),
            Some(Metric::EarningsPerShare)
        );
        assert_eq!(
            Metric::detect("Tesla made a profit of $15 billion"),
            Some(Metric::NetIncome)
        );
        assert_eq!(Metric::detect("The sky is blue"), None);
    }

    #[test]
    fn test_period_detection() {
        assert_eq!(
            Period::detect("Q1 2024 revenue"),
            Some(Period {
                fiscal_year: 2024,
                fiscal_period: "Q1".into()
            })
        );
        assert_eq!(
            Period::detect("FY2023 revenue was $211.9 billion"),
            Some(Period {
                fiscal_year: 2023,
                fiscal_period: "FY".into()
            })
        );
        assert_eq!(Period::detect("revenue last year"), None);
    }

    #[test]
    fn test_select_fact_by_period() {
        let facts = vec![
            fact("2023-03-31", 69.8e9, 2024, "Q1", "10-Q"),
            fact("2024-03-31", 80.5e9, 2024, "Q1", "10-Q"),
            fact("2023-12-31", 307.4e9, 2023, "FY", "10-K"),
        ];
        let q1 = Period {
            fiscal_year: 2024,
            fiscal_period: "Q1".into(),
        };
        assert_eq!(select_fact(&facts, Some(&q1)).map(|f| f.val), Some(80.5e9));
        assert_eq!(select_fact(&facts, None).map(|f| f.val), Some(307.4e9));
    }

    #[test]
    fn test_judge_fact() {
        let fact = fact("2024-03-31", 80_539_000_000.0, 2024, "Q1", "10-Q");
        let figure = figures::primary_figure("revenue was $80.5 billion").unwrap();
        let finding = judge_fact("GOOGL", Metric::Revenue, figure, &fact, Tolerance::default());
        assert_eq!(finding.classification, Classification::Match);
        assert!(finding.evidence_text.contains("Q1 2024"));

        let figure = figures::primary_figure("revenue was $95 billion").unwrap();
        let finding = judge_fact("GOOGL", Metric::Revenue, figure, &fact, Tolerance::default());
        assert_eq!(finding.classification, Classification::Mismatch);
    }

    #[test]
    fn test_concept_response_shape() {
        let body = r#"{"cik":1652044,"taxonomy":"us-gaap","tag":"Revenues",
            "units":{"USD":[{"end":"2024-03-31","val":80539000000,"fy":2024,"fp":"Q1","form":"10-Q","filed":"2024-04-26"}]}}"#;
        let parsed: ConceptResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.units["USD"][0].val, 80_539_000_000.0);
    }
}
