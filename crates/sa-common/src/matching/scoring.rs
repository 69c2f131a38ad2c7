use std::collections::HashSet;

use super::candidates::Candidate;
use super::{config::MatchConfig, config::ScoringPolicy, CompanyLookup};
use crate::similarity::company_name_similarity;
use crate::{Deal, Order};

/// Per-signal breakdown of a weighted confidence score. Terms are
/// independently capped and sum to at most 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBreakdown {
    /// 0-50: Jaccard overlap of product sets.
    pub product: f64,
    /// 0-30: tiered value closeness.
    pub value: f64,
    /// 0-15: tiered temporal proximity.
    pub temporal: f64,
    /// 0-5: company identity or name similarity.
    pub company: f64,
    pub total: f64,
}

/// Computes a confidence score in [0, 100] for one order/candidate pair
/// under the configured scoring policy.
pub struct Scorer<'a> {
    config: &'a MatchConfig,
    companies: &'a CompanyLookup<'a>,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a MatchConfig, companies: &'a CompanyLookup<'a>) -> Self {
        Self { config, companies }
    }

    /// `candidate_count` is the number of deals that survived the candidate
    /// filter for this order; the decay policy grants its bonus only when it
    /// is exactly one.
    pub fn score(&self, order: &Order, candidate: &Candidate<'_>, candidate_count: usize) -> f64 {
        match self.config.scoring_policy {
            ScoringPolicy::Weighted => self.weighted_score(order, candidate).total,
            ScoringPolicy::DecayBonus => self.decay_bonus_score(
                candidate.days_diff,
                candidate.value_diff_pct,
                candidate_count == 1,
            ),
        }
    }

    pub fn weighted_score(&self, order: &Order, candidate: &Candidate<'_>) -> ScoreBreakdown {
        let product = product_term(order, candidate.deal);
        let value = value_term(candidate.value_diff_pct);
        let temporal = temporal_term(candidate.days_diff.abs());
        let company = self.company_term(order, candidate.deal);

        ScoreBreakdown {
            product,
            value,
            temporal,
            company,
            total: (product + value + temporal + company).min(100.0),
        }
    }

    /// Start at 100, lose `temporal_decay_per_day` per day of distance and
    /// `value_penalty_per_5_percent` per 5% of value difference, gain the
    /// unique-deal bonus when the filter left a single candidate.
    pub fn decay_bonus_score(&self, days_diff: i64, value_diff_pct: f64, unique: bool) -> f64 {
        let mut score = 100.0
            - days_diff.unsigned_abs() as f64 * self.config.temporal_decay_per_day
            - (value_diff_pct / 5.0) * self.config.value_penalty_per_5_percent;

        if unique {
            score += self.config.unique_deal_bonus;
        }

        score.clamp(0.0, 100.0)
    }

    /// 5 points on exact company id, otherwise fuzzy name similarity scaled
    /// to the cap. Missing lookup entries score 0.
    fn company_term(&self, order: &Order, deal: &Deal) -> f64 {
        if order.company_id == deal.company_id {
            return 5.0;
        }

        match (
            self.companies.get(order.company_id.as_str()),
            self.companies.get(deal.company_id.as_str()),
        ) {
            (Some(order_company), Some(deal_company)) => {
                company_name_similarity(&order_company.name, &deal_company.name) * 5.0
            }
            _ => 0.0,
        }
    }
}

/// Jaccard similarity of the lower-cased, trimmed product sets, scaled to 50.
/// Neutral 25 when neither side lists products; 0 when exactly one does.
fn product_term(order: &Order, deal: &Deal) -> f64 {
    match (product_set(&order.products), product_set(&deal.products)) {
        (Some(order_products), Some(deal_products)) => {
            let intersection = order_products.intersection(&deal_products).count();
            let union = order_products.union(&deal_products).count();
            if union == 0 {
                0.0
            } else {
                intersection as f64 / union as f64 * 50.0
            }
        }
        (None, None) => 25.0,
        _ => 0.0,
    }
}

fn product_set(products: &Option<Vec<String>>) -> Option<HashSet<String>> {
    let products = products.as_ref()?;
    if products.is_empty() {
        return None;
    }
    Some(
        products
            .iter()
            .map(|p| p.trim().to_lowercase())
            .collect(),
    )
}

fn value_term(value_diff_pct: f64) -> f64 {
    if value_diff_pct <= 1.0 {
        30.0
    } else if value_diff_pct <= 5.0 {
        25.0
    } else if value_diff_pct <= 10.0 {
        20.0
    } else if value_diff_pct <= 15.0 {
        15.0
    } else {
        (30.0 - value_diff_pct * 1.5).max(0.0)
    }
}

fn temporal_term(days_diff: i64) -> f64 {
    if days_diff <= 7 {
        15.0
    } else if days_diff <= 14 {
        12.0
    } else if days_diff <= 30 {
        8.0
    } else {
        // Capped at the <=30-day tier so the term never rises with distance.
        (15.0 - days_diff as f64 / 6.0).clamp(0.0, 8.0)
    }
}
