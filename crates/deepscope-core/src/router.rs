//! Source registry / router
//!
//! A static table from [`ClaimCategory`] to the ordered list of adapters that
//! can speak to claims of that category. Routes are always held in adapter
//! precedence order, so `select` is order-stable across calls and consensus
//! tie-breaks see the same sequence every time.
//!
//! The table is validated once at startup against the registered adapters;
//! after that `select` is infallible.

use std::collections::{BTreeMap, BTreeSet};

use crate::claim::ClaimCategory;
use crate::error::ConfigError;
use crate::evidence::AdapterId;

/// Category → adapter routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRouter {
    routes: BTreeMap<ClaimCategory, Vec<AdapterId>>,
}

impl Default for SourceRouter {
    fn default() -> Self {
        use AdapterId::*;

        Self::empty()
            .with_route(
                ClaimCategory::MarketData,
                [MarketData, FactCheckSearch, LlmReasoning],
            )
            .with_route(
                ClaimCategory::CompanyFinancials,
                [Filings, MarketData, FactCheckSearch, LlmReasoning],
            )
            .with_route(
                ClaimCategory::Macroeconomic,
                [ReferenceTable, FactCheckSearch, LlmReasoning],
            )
            .with_route(
                ClaimCategory::Regulatory,
                [Filings, FactCheckSearch, LlmReasoning],
            )
            .with_route(
                ClaimCategory::Other,
                [ReferenceTable, FactCheckSearch, LlmReasoning],
            )
    }
}

impl SourceRouter {
    /// Router with the default category table
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with no routes at all; build it up with [`Self::with_route`]
    pub fn empty() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Replace the route for `category`.
    ///
    /// Adapters are deduplicated and put into precedence order.
    pub fn with_route(
        mut self,
        category: ClaimCategory,
        adapters: impl IntoIterator<Item = AdapterId>,
    ) -> Self {
        let ordered: BTreeSet<AdapterId> = adapters.into_iter().collect();
        self.routes.insert(category, ordered.into_iter().collect());
        self
    }

    /// Adapters to consult for a claim of this category.
    ///
    /// Categories without their own route use the generic (`Other`) route.
    pub fn select(&self, category: ClaimCategory) -> &[AdapterId] {
        self.routes
            .get(&category)
            .or_else(|| self.routes.get(&ClaimCategory::Other))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every adapter referenced by any route
    pub fn referenced(&self) -> BTreeSet<AdapterId> {
        self.routes.values().flatten().copied().collect()
    }

    /// Check the table is total and fully backed by registered adapters.
    pub fn validate(&self, registered: &[AdapterId]) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for id in registered {
            if !seen.insert(*id) {
                return Err(ConfigError::DuplicateAdapter(*id));
            }
        }

        for category in ClaimCategory::ALL {
            let route = self.select(category);
            if route.is_empty() {
                return Err(ConfigError::EmptyRoute(category));
            }
            if let Some(missing) = route.iter().find(|id| !seen.contains(id)) {
                return Err(ConfigError::MissingAdapter {
                    category,
                    adapter: *missing,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_routes_are_total() {
        let router = SourceRouter::new();
        for category in ClaimCategory::ALL {
            assert!(!router.select(category).is_empty(), "{category} has no route");
        }
        assert!(router.validate(&AdapterId::ALL).is_ok());
    }

    #[test]
    fn test_routes_in_precedence_order() {
        let router = SourceRouter::empty().with_route(
            ClaimCategory::Other,
            [
                AdapterId::LlmReasoning,
                AdapterId::Filings,
                AdapterId::LlmReasoning,
                AdapterId::FactCheckSearch,
            ],
        );
        assert_eq!(
            router.select(ClaimCategory::Other),
            &[
                AdapterId::Filings,
                AdapterId::FactCheckSearch,
                AdapterId::LlmReasoning
            ]
        );
    }

    #[test]
    fn test_select_is_stable() {
        let router = SourceRouter::new();
        let first = router.select(ClaimCategory::CompanyFinancials).to_vec();
        for _ in 0..10 {
            assert_eq!(router.select(ClaimCategory::CompanyFinancials), first.as_slice());
        }
    }

    #[test]
    fn test_missing_category_falls_back_to_generic() {
        let router =
            SourceRouter::empty().with_route(ClaimCategory::Other, [AdapterId::LlmReasoning]);
        assert_eq!(
            router.select(ClaimCategory::Regulatory),
            &[AdapterId::LlmReasoning]
        );
        assert!(router.validate(&[AdapterId::LlmReasoning]).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_route() {
        let router = SourceRouter::new().with_route(ClaimCategory::Regulatory, Vec::<AdapterId>::new());
        assert_eq!(
            router.validate(&AdapterId::ALL),
            Err(ConfigError::EmptyRoute(ClaimCategory::Regulatory))
        );
    }

    #[test]
    fn test_validate_rejects_unregistered_adapter() {
        let router = SourceRouter::new();
        let registered = [
            AdapterId::MarketData,
            AdapterId::FactCheckSearch,
            AdapterId::LlmReasoning,
        ];
        assert_eq!(
            router.validate(&registered),
            Err(ConfigError::MissingAdapter {
                category: ClaimCategory::CompanyFinancials,
                adapter: AdapterId::Filings,
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let router = SourceRouter::new();
        let mut registered = AdapterId::ALL.to_vec();
        registered.push(AdapterId::Filings);
        assert_eq!(
            router.validate(&registered),
            Err(ConfigError::DuplicateAdapter(AdapterId::Filings))
        );
    }

    #[test]
    fn test_empty_router_fails_validation() {
        assert_eq!(
            SourceRouter::empty().validate(&AdapterId::ALL),
            Err(ConfigError::EmptyRoute(ClaimCategory::MarketData))
        );
    }
}
