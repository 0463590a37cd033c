//! Claim categories and label parsing

use serde::{Deserialize, Serialize};

/// Category of a claim, used by the router to pick evidence sources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    /// Prices, volumes, market caps, index levels
    MarketData,
    /// Revenue, earnings, margins and other reported figures
    CompanyFinancials,
    /// Inflation, rates, employment, GDP
    Macroeconomic,
    /// Filings, enforcement, compliance
    Regulatory,
    /// Anything else (routed to the generic source set)
    #[default]
    Other,
}

// Checked in order; the first category with a hit wins.
const KEYWORDS: &[(ClaimCategory, &[&str])] = &[
    (
        ClaimCategory::Regulatory,
        &[
            "sec filing", "edgar", "10-k", "10-q", "8-k", "regulator", "regulators",
            "lawsuit", "settlement", "fined", "sec",
        ],
    ),
    (
        ClaimCategory::CompanyFinancials,
        &[
            "revenue", "revenues", "profit", "profits", "earnings", "eps", "guidance", "q1",
            "q2", "q3", "q4", "quarterly results", "cash flow", "balance sheet", "margin",
            "margins", "financials", "net income",
        ],
    ),
    (
        ClaimCategory::MarketData,
        &[
            "stock", "stocks", "share", "shares", "share price", "ticker", "dividend",
            "nasdaq", "dow jones", "s&p", "market cap", "traded", "trading",
        ],
    ),
    (
        ClaimCategory::Macroeconomic,
        &[
            "inflation", "interest rate", "interest rates", "gdp", "unemployment", "cpi",
            "federal reserve", "the fed", "recession",
        ],
    ),
];

impl ClaimCategory {
    /// Every category, in routing-table order.
    pub const ALL: [ClaimCategory; 5] = [
        Self::MarketData,
        Self::CompanyFinancials,
        Self::Macroeconomic,
        Self::Regulatory,
        Self::Other,
    ];

    /// Parse a category label produced by the extraction step.
    ///
    /// Accepts `market_data`, `MarketData`, `market data` and `market-data`
    /// spellings. Unknown labels map to [`ClaimCategory::Other`].
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "marketdata" | "market" => Self::MarketData,
            "companyfinancials" | "financials" | "financial" => Self::CompanyFinancials,
            "macroeconomic" | "macro" | "economic" => Self::Macroeconomic,
            "regulatory" | "regulation" => Self::Regulatory,
            _ => Self::Other,
        }
    }

    /// Infer a category from claim text when no label was supplied.
    pub fn infer(text: &str) -> Self {
        // Pad and strip punctuation so keywords only match whole words
        let mut haystack = String::with_capacity(text.len() + 2);
        haystack.push(' ');
        for c in text.chars() {
            if c.is_alphanumeric() || c == '&' || c == '-' {
                haystack.extend(c.to_lowercase());
            } else {
                haystack.push(' ');
            }
        }
        haystack.push(' ');

        for (category, words) in KEYWORDS {
            if words
                .iter()
                .any(|w| haystack.contains(&format!(" {} ", w)))
            {
                return *category;
            }
        }
        Self::Other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketData => "market_data",
            Self::CompanyFinancials => "company_financials",
            Self::Macroeconomic => "macroeconomic",
            Self::Regulatory => "regulatory",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_spellings() {
        assert_eq!(ClaimCategory::from_label("market_data"), ClaimCategory::MarketData);
        assert_eq!(ClaimCategory::from_label("MarketData"), ClaimCategory::MarketData);
        assert_eq!(
            ClaimCategory::from_label("Company Financials"),
            ClaimCategory::CompanyFinancials
        );
        assert_eq!(ClaimCategory::from_label("macro-economic"), ClaimCategory::Macroeconomic);
        assert_eq!(ClaimCategory::from_label("REGULATORY"), ClaimCategory::Regulatory);
    }

    #[test]
    fn test_unknown_label_is_other() {
        assert_eq!(ClaimCategory::from_label("sports"), ClaimCategory::Other);
        assert_eq!(ClaimCategory::from_label(""), ClaimCategory::Other);
    }

    #[test]
    fn test_infer_from_keywords() {
        assert_eq!(
            ClaimCategory::infer("Tesla's Q2 revenue grew 20%"),
            ClaimCategory::CompanyFinancials
        );
        assert_eq!(
            ClaimCategory::infer("NVDA stock closed at $120"),
            ClaimCategory::MarketData
        );
        assert_eq!(
            ClaimCategory::infer("Inflation hit 9.1% in June 2022"),
            ClaimCategory::Macroeconomic
        );
        assert_eq!(
            ClaimCategory::infer("The company disclosed it in its 10-K"),
            ClaimCategory::Regulatory
        );
    }

    #[test]
    fn test_infer_matches_whole_words_only() {
        // "second" must not trip the "sec" keyword
        assert_eq!(
            ClaimCategory::infer("Water boils at 100 degrees, every second of the day"),
            ClaimCategory::Other
        );
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ClaimCategory::CompanyFinancials).unwrap();
        assert_eq!(json, "\"company_financials\"");
    }
}
