//! Claim type definitions

use serde::{Deserialize, Serialize};

use super::ClaimCategory;

/// Opaque reference to the claim's position in its originating transcript.
///
/// The persistence layer decides the format (e.g. `"<video-id>#<sentence>"`);
/// the verification core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Locator for claims submitted directly rather than extracted from a transcript
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_detached(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One `{text, category}` pair from the claim extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedClaim {
    pub text: String,
    /// Category label as produced by the extractor, if any
    #[serde(default)]
    pub category: Option<String>,
}

impl ExtractedClaim {
    pub fn new(text: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            text: text.into(),
            category: category.map(str::to_string),
        }
    }
}

/// A single falsifiable statement to verify.
///
/// Immutable once built: fields are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    text: String,
    category: ClaimCategory,
    #[serde(default, skip_serializing_if = "SourceLocator::is_detached")]
    source_locator: SourceLocator,
}

impl Claim {
    pub fn new(
        text: impl Into<String>,
        category: ClaimCategory,
        source_locator: SourceLocator,
    ) -> Self {
        Self {
            text: text.into().trim().to_string(),
            category,
            source_locator,
        }
    }

    /// Build a claim from extractor output.
    ///
    /// A supplied label is parsed with [`ClaimCategory::from_label`]; without
    /// one the category is inferred from the text.
    pub fn from_extracted(extracted: ExtractedClaim, source_locator: SourceLocator) -> Self {
        let category = match extracted.category.as_deref() {
            Some(label) if !label.trim().is_empty() => ClaimCategory::from_label(label),
            _ => ClaimCategory::infer(&extracted.text),
        };
        Self::new(extracted.text, category, source_locator)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> ClaimCategory {
        self.category
    }

    pub fn source_locator(&self) -> &SourceLocator {
        &self.source_locator
    }
}
