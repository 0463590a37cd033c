//! Ticker symbols in claim text
//!
//! Market-data and filings adapters key their queries on a ticker. Explicit
//! forms (`$AAPL`, `(AAPL)`, `NASDAQ: AAPL`) win; otherwise a short list of
//! well-known company names is consulted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CASHTAG: Regex = Regex::new(r"\$([A-Z]{1,5}(?:\.[A-Z])?)\b").expect("valid pattern");
    static ref EXCHANGE: Regex =
        Regex::new(r"\b(?:NASDAQ|NYSE|AMEX|Nasdaq|Nyse)\s*:\s*([A-Z]{1,5}(?:\.[A-Z])?)\b")
            .expect("valid pattern");
    static ref PARENTHESISED: Regex =
        Regex::new(r"\(([A-Z]{1,5}(?:\.[A-Z])?)\)").expect("valid pattern");
}

// Whole-word, lowercase company names
const COMPANY_ALIASES: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("alphabet", "GOOGL"),
    ("google", "GOOGL"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("nvidia", "NVDA"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
    ("berkshire hathaway", "BRK.B"),
    ("jpmorgan", "JPM"),
    ("walmart", "WMT"),
    ("intel", "INTC"),
];

// Parenthesised words that are not tickers
const NOT_TICKERS: &[&str] = &["CEO", "CFO", "GDP", "CPI", "EPS", "USD", "SEC", "AI", "US", "UK", "EU"];

/// The ticker a claim refers to, if one can be found.
pub fn extract_ticker(text: &str) -> Option<String> {
    for pattern in [&*EXCHANGE, &*CASHTAG, &*PARENTHESISED] {
        let found = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|t| !NOT_TICKERS.contains(t));
        if let Some(ticker) = found {
            return Some(ticker.to_string());
        }
    }

    let words = normalized_words(text);
    COMPANY_ALIASES
        .iter()
        .find(|(name, _)| words.contains(&format!(" {} ", name)))
        .map(|(_, ticker)| ticker.to_string())
}

fn normalized_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.push(' ');
    out
}
