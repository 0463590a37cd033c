//! Curated reference figures
//!
//! Offline numeric comparison against a table of well-established figures,
//! each matched by keywords that must all appear in the claim. Comparison
//! carries an absolute floor in the reference's unit, so figures at or near
//! zero (the freezing point of water) still agree with rounded claims.

use async_trait::async_trait;
use deepscope_core::evidence::AdapterId;
use deepscope_core::figures::{self, Figure, FigureKind, Tolerance};
use deepscope_core::Claim;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::adapter::{Classification, EvidenceAdapter, Finding};
use crate::error::AdapterError;

pub const SOURCE_NAME: &str = "Reference figures";

/// Default absolute agreement, in the reference figure's unit
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 0.5;

/// One curated figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFigure {
    /// Lowercase stems; every one must occur in the claim text
    pub keywords: Vec<String>,
    pub value: f64,
    #[serde(default = "plain")]
    pub kind: FigureKind,
    pub description: String,
    #[serde(default)]
    pub source_url: String,
}

fn plain() -> FigureKind {
    FigureKind::Plain
}

impl ReferenceFigure {
    pub fn new(keywords: &[&str], value: f64, kind: FigureKind, description: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            value,
            kind,
            description: description.to_string(),
            source_url: String::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.source_url = url.to_string();
        self
    }

    fn applies_to(&self, lowercase_text: &str) -> bool {
        !self.keywords.is_empty() && self.keywords.iter().all(|k| lowercase_text.contains(k.as_str()))
    }

    /// The claimed figure expressed in this reference's unit, if comparable
    fn normalize(&self, figure: Figure) -> Option<f64> {
        use FigureKind::*;
        match (self.kind, figure.kind) {
            (Celsius, Fahrenheit) => Some((figure.value - 32.0) * 5.0 / 9.0),
            (Fahrenheit, Celsius) => Some(figure.value * 9.0 / 5.0 + 32.0),
            // A bare number is read in the reference's own unit
            (_, Plain) => Some(figure.value),
            (reference, claimed) if reference == claimed => Some(figure.value),
            _ => None,
        }
    }
}

/// Figures available without any configuration
pub fn builtin_figures() -> Vec<ReferenceFigure> {
    vec![
        ReferenceFigure::new(
            &["water", "boil"],
            100.0,
            FigureKind::Celsius,
            "Water boils at 100°C at sea level",
        )
        .with_url("https://en.wikipedia.org/wiki/Boiling_point"),
        ReferenceFigure::new(
            &["water", "freez"],
            0.0,
            FigureKind::Celsius,
            "Water freezes at 0°C at sea level",
        )
        .with_url("https://en.wikipedia.org/wiki/Melting_point"),
        ReferenceFigure::new(
            &["body", "temperature"],
            37.0,
            FigureKind::Celsius,
            "Normal human body temperature is about 37°C",
        )
        .with_url("https://en.wikipedia.org/wiki/Human_body_temperature"),
    ]
}

pub struct ReferenceTableAdapter {
    figures: Vec<ReferenceFigure>,
    tolerance: Tolerance,
}

impl ReferenceTableAdapter {
    pub fn new(figures: Vec<ReferenceFigure>, tolerance: Tolerance) -> Self {
        Self { figures, tolerance }
    }

    /// Classify claim text against the table.
    pub fn judge(&self, text: &str) -> Finding {
        let lowercase = text.to_lowercase();
        let Some(reference) = self.figures.iter().find(|f| f.applies_to(&lowercase)) else {
            return Finding::no_data("no reference figure covers this claim");
        };

        let claimed = figures::extract(text)
            .into_iter()
            .filter(|f| !f.is_probable_year())
            .find_map(|f| reference.normalize(f));
        let Some(claimed) = claimed else {
            return Finding::no_data(format!(
                "claim states no figure comparable with: {}",
                reference.description
            ));
        };

        let verification = figures::compare(claimed, reference.value, self.tolerance);
        Finding::new(
            Classification::compared(verification),
            format!("{} (claimed {})", reference.description, claimed),
        )
        .with_url(reference.source_url.clone())
        .with_value(reference.value)
    }
}

impl Default for ReferenceTableAdapter {
    fn default() -> Self {
        Self::new(
            builtin_figures(),
            Tolerance::default().with_absolute(DEFAULT_ABSOLUTE_TOLERANCE),
        )
    }
}

#[async_trait]
impl EvidenceAdapter for ReferenceTableAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::ReferenceTable
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn verify(&self, claim: &Claim, _deadline: Instant) -> Result<Finding, AdapterError> {
        Ok(self.judge(claim.text()))
    }
}
