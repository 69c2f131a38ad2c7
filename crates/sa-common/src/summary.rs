use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribution::AttributionMethod;
use crate::matching::MatchOutcome;

/// Batch-level statistics over one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total_orders: usize,
    pub matched_count: usize,
    pub self_service_count: usize,
    pub needs_review_count: usize,
    /// matched / total, as a percentage rounded to 2 decimals. 0 when the
    /// batch is empty.
    pub match_rate_percent: f64,
    /// Mean confidence over matched attributions only. 0 when none matched.
    pub average_confidence: f64,
    /// Count per attribution method across all three buckets.
    pub attribution_methods: BTreeMap<AttributionMethod, usize>,
}

impl MatchSummary {
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        let total_orders = outcome.total_orders();
        let matched_count = outcome.matched.len();

        let match_rate_percent = if total_orders == 0 {
            0.0
        } else {
            round2(matched_count as f64 / total_orders as f64 * 100.0)
        };

        let average_confidence = if matched_count == 0 {
            0.0
        } else {
            round2(
                outcome
                    .matched
                    .iter()
                    .map(|a| a.confidence_score)
                    .sum::<f64>()
                    / matched_count as f64,
            )
        };

        let mut attribution_methods = BTreeMap::new();
        for attribution in outcome.all() {
            *attribution_methods
                .entry(attribution.attribution_method)
                .or_insert(0) += 1;
        }

        Self {
            total_orders,
            matched_count,
            self_service_count: outcome.self_service.len(),
            needs_review_count: outcome.needs_review.len(),
            match_rate_percent,
            average_confidence,
            attribution_methods,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
