//! Core error types

use thiserror::Error;

use crate::claim::ClaimCategory;
use crate::evidence::AdapterId;
use crate::lifecycle::ClaimState;

/// Structural misconfiguration of the source routing table.
///
/// These are fatal and surface to the caller instead of producing an
/// empty verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A category resolves to no adapters at all
    #[error("no adapters routed for category '{0}'")]
    EmptyRoute(ClaimCategory),

    /// A routed adapter has no registered implementation
    #[error("category '{category}' routes to unregistered adapter '{adapter}'")]
    MissingAdapter {
        category: ClaimCategory,
        adapter: AdapterId,
    },

    /// Two implementations registered under the same adapter id
    #[error("adapter '{0}' registered more than once")]
    DuplicateAdapter(AdapterId),
}

/// A verdict record failed validation at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed record: {field} {reason}")]
pub struct MalformedRecord {
    pub field: &'static str,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Illegal claim lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal claim state transition: {from} -> {to}")]
pub struct LifecycleError {
    pub from: ClaimState,
    pub to: ClaimState,
}
