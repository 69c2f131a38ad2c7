use super::config::MatchConfig;
use super::selector::MatchSelector;
use super::CompanyLookup;
use crate::attribution::Attribution;
use crate::{Company, Deal, Order};

/// Attributions partitioned by outcome: confident matches, self-service
/// orders, and matches awaiting human confirmation.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub matched: Vec<Attribution>,
    pub self_service: Vec<Attribution>,
    pub needs_review: Vec<Attribution>,
}

impl MatchOutcome {
    pub fn total_orders(&self) -> usize {
        self.matched.len() + self.self_service.len() + self.needs_review.len()
    }

    pub fn all(&self) -> impl Iterator<Item = &Attribution> {
        self.matched
            .iter()
            .chain(self.self_service.iter())
            .chain(self.needs_review.iter())
    }
}

/// Drives the per-order decision sequence over an immutable batch. Lookup
/// tables are built once per batch; orders are processed in input order so
/// results are deterministic.
pub struct MatchingEngine {
    config: MatchConfig,
}

impl MatchingEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn match_orders(
        &self,
        companies: &[Company],
        deals: &[Deal],
        orders: &[Order],
    ) -> MatchOutcome {
        let company_lookup: CompanyLookup<'_> =
            companies.iter().map(|c| (c.id.as_str(), c)).collect();
        let won_deals: Vec<&Deal> = deals.iter().filter(|d| d.is_won()).collect();

        let selector = MatchSelector::new(&self.config, &company_lookup);

        let mut outcome = MatchOutcome::default();
        for order in orders {
            let attribution = selector.decide(order, &won_deals);
            if attribution.is_self_service() {
                outcome.self_service.push(attribution);
            } else if attribution.needs_review {
                outcome.needs_review.push(attribution);
            } else {
                outcome.matched.push(attribution);
            }
        }

        outcome
    }
}
