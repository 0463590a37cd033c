//! Numeric figures in claim text
//!
//! Numeric-comparison adapters need the figure a claim asserts
//! (`"$4.2 billion"`, `"9.1%"`, `"105°C"`, `"fell 3%"`) and a
//! tolerance-based comparison against the figure a source reports.
//!
//! Figures are signed: a leading minus sign, or a falling-direction word
//! in front of a percentage ("fell 3%", "down 2.5%"), makes the value
//! negative.
//!
//! # Example
//!
//! ```rust
//! use deepscope_core::figures::{compare, primary_figure, FigureKind, Tolerance};
//! use deepscope_core::evidence::Verification;
//!
//! let figure = primary_figure("Water boils at 105°C at sea level").unwrap();
//! assert_eq!(figure.kind, FigureKind::Celsius);
//! assert_eq!(compare(figure.value, 100.0, Tolerance::default()), Verification::Mismatch);
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::evidence::Verification;

/// Default relative tolerance for numeric agreement (1%)
pub const DEFAULT_TOLERANCE: f64 = 0.01;

// Guards the relative comparison when the reported value is zero
const EPSILON: f64 = 1e-9;

// Words before a percentage that mean the move was downward
const FALLING: &[&str] = &[
    "fell", "fall", "falls", "falling", "dropped", "drop", "drops", "down", "declined",
    "decline", "declines", "decreased", "decrease", "lost", "lose", "loses", "slid", "slipped",
    "sank", "plunged", "plummeted", "tumbled", "shrank", "contracted", "lower",
];

const RISING: &[&str] = &[
    "rose", "rise", "rises", "rising", "up", "gained", "gain", "gains", "climbed", "jumped",
    "increased", "increase", "grew", "grow", "surged", "soared", "higher",
];

// How many words before a percentage are searched for a direction
const DIRECTION_WINDOW: usize = 4;

lazy_static! {
    static ref FIGURE: Regex = Regex::new(
        r"(?x)
        (?P<sign>[-−])?
        (?:(?P<cur>[$€£])\s?|\b)
        (?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)
        \s?
        (?P<suffix>
            %
          | (?i:percent)\b
          | °\s?[CcFf]\b
          | (?i:degrees?\s+(?:celsius|fahrenheit))\b
          | (?i:trillion|billion|million|thousand|tn|bn)\b
          | [KkMmBb]\b
        )?"
    )
    .expect("figure pattern is valid");
}

/// What a figure measures, as far as the text tells us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    Plain,
    Currency,
    Percent,
    Celsius,
    Fahrenheit,
}

/// A number asserted in claim text, with any scale suffix applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub value: f64,
    pub kind: FigureKind,
    /// Whether a scale word or suffix (million, bn, K) was applied
    pub scaled: bool,
}

impl Figure {
    /// Bare four-digit integers in this range read as years, not amounts
    pub fn is_probable_year(&self) -> bool {
        self.kind == FigureKind::Plain
            && !self.scaled
            && self.value.fract() == 0.0
            && (1900.0..=2100.0).contains(&self.value)
    }
}

/// Extract every figure in `text`, in order of appearance.
pub fn extract(text: &str) -> Vec<Figure> {
    FIGURE
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.name("num")?.as_str().replace(',', "");
            let mut value: f64 = raw.parse().ok()?;
            let mut kind = if caps.name("cur").is_some() {
                FigureKind::Currency
            } else {
                FigureKind::Plain
            };
            let mut scaled = false;

            if let Some(suffix) = caps.name("suffix") {
                let suffix = suffix.as_str().to_lowercase();
                if suffix == "%" || suffix == "percent" {
                    kind = FigureKind::Percent;
                } else if suffix.starts_with('°') || suffix.starts_with("degree") {
                    kind = if suffix.ends_with('f') || suffix.ends_with("fahrenheit") {
                        FigureKind::Fahrenheit
                    } else {
                        FigureKind::Celsius
                    };
                } else {
                    let multiplier = match suffix.as_str() {
                        "trillion" | "tn" => 1e12,
                        "billion" | "bn" | "b" => 1e9,
                        "million" | "m" => 1e6,
                        "thousand" | "k" => 1e3,
                        _ => 1.0,
                    };
                    value *= multiplier;
                    scaled = true;
                }
            }

            let start = caps.get(0)?.start();
            let negative = match caps.name("sign") {
                // A hyphen after a word or digit is a range or label ("3-5%", "2023-24")
                Some(_) => !text[..start]
                    .chars()
                    .next_back()
                    .is_some_and(char::is_alphanumeric),
                None => kind == FigureKind::Percent && falling_before(&text[..start]),
            };
            if negative {
                value = -value;
            }

            Some(Figure {
                value,
                kind,
                scaled,
            })
        })
        .collect()
}

/// Whether the words just before a percentage describe a downward move.
///
/// "fell 3%" and "down 3%" are moves; "fell to 3%" is a level. The nearest
/// direction word decides, and an earlier number ends the search.
fn falling_before(prefix: &str) -> bool {
    let mut words = prefix
        .rsplit(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .take(DIRECTION_WINDOW)
        .map(str::to_lowercase)
        .peekable();

    if words.peek().is_some_and(|w| w == "to") {
        return false;
    }
    for word in words {
        if word.starts_with(|c: char| c.is_ascii_digit()) || RISING.contains(&word.as_str()) {
            return false;
        }
        if FALLING.contains(&word.as_str()) {
            return true;
        }
    }
    false
}

/// The figure a claim most plausibly asserts.
///
/// Currency, percent and temperature figures win over plain numbers; bare
/// years are skipped.
pub fn primary_figure(text: &str) -> Option<Figure> {
    let figures: Vec<Figure> = extract(text)
        .into_iter()
        .filter(|f| !f.is_probable_year())
        .collect();

    figures
        .iter()
        .find(|f| f.kind != FigureKind::Plain)
        .or_else(|| figures.first())
        .copied()
}

/// Agreement band for numeric comparison.
///
/// Two figures agree when they differ by no more than `relative` times the
/// reported magnitude, or by no more than `absolute`, whichever is wider.
/// The absolute floor keeps references at or near zero comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::relative(DEFAULT_TOLERANCE)
    }
}

impl Tolerance {
    /// Purely relative band, no absolute floor
    pub fn relative(relative: f64) -> Self {
        Self {
            relative,
            absolute: 0.0,
        }
    }

    pub fn with_absolute(mut self, absolute: f64) -> Self {
        self.absolute = absolute;
        self
    }

    /// Largest difference from `reported` that still agrees
    pub fn band(&self, reported: f64) -> f64 {
        (self.relative * reported.abs().max(EPSILON)).max(self.absolute)
    }
}

/// Compare a claimed figure with a reported one.
///
/// Only ever yields `Match` or `Mismatch`; whether a comparable figure exists
/// at all is the caller's `NoData` decision.
pub fn compare(claimed: f64, reported: f64, tolerance: Tolerance) -> Verification {
    if (claimed - reported).abs() <= tolerance.band(reported) {
        Verification::Match
    } else {
        Verification::Mismatch
    }
}

/// Relative difference between claimed and reported, for evidence text
pub fn relative_delta(claimed: f64, reported: f64) -> f64 {
    (claimed - reported) / reported.abs().max(EPSILON)
}
