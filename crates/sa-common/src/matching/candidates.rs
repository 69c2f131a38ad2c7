use chrono::{DateTime, Utc};

use super::{config::MatchConfig, CompanyLookup};
use crate::similarity::company_name_similarity;
use crate::{Deal, Order};

/// A deal of near-exact amount is admitted even when the company cannot be
/// matched, and counts as a tight value match when picking the attribution
/// method.
pub const NEAR_EXACT_VALUE_PERCENT: f64 = 5.0;

/// A won deal that survived temporal, value, and company admission for one
/// order, with its diagnostics precomputed.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub deal: &'a Deal,
    /// `order_date - close_date` in days; positive when the deal closed
    /// before the order.
    pub days_diff: i64,
    pub value_diff_pct: f64,
}

/// Percentage difference of an order amount against a deal amount.
/// A zero deal amount counts as a 100% difference unless the order amount is
/// also zero.
pub fn value_diff_percent(order_amount: f64, deal_amount: f64) -> f64 {
    if deal_amount == 0.0 {
        return if order_amount != 0.0 { 100.0 } else { 0.0 };
    }
    (order_amount - deal_amount).abs() / deal_amount * 100.0
}

pub fn days_between(order_date: DateTime<Utc>, close_date: DateTime<Utc>) -> i64 {
    order_date.signed_duration_since(close_date).num_days()
}

/// Narrows the pool of won deals down to the ones plausibly responsible for
/// one order.
pub struct CandidateFilter<'a> {
    config: &'a MatchConfig,
    companies: &'a CompanyLookup<'a>,
}

impl<'a> CandidateFilter<'a> {
    pub fn new(config: &'a MatchConfig, companies: &'a CompanyLookup<'a>) -> Self {
        Self { config, companies }
    }

    /// Temporal window, then value tolerance, then company admission.
    /// Duplicate deals are preserved as distinct candidates; input order is
    /// kept so downstream tie-breaks stay deterministic.
    pub fn filter_candidates<'d>(
        &self,
        order: &Order,
        won_deals: &[&'d Deal],
    ) -> Vec<Candidate<'d>> {
        won_deals
            .iter()
            .filter_map(|deal| self.evaluate_candidate(order, deal))
            .collect()
    }

    /// Runs one deal through the filters; `None` means rejected.
    pub fn evaluate_candidate<'d>(&self, order: &Order, deal: &'d Deal) -> Option<Candidate<'d>> {
        let close_date = deal.close_date?;

        let days_diff = days_between(order.order_date, close_date);
        if !self.config.temporal_window.contains(days_diff) {
            return None;
        }

        let value_diff_pct = value_diff_percent(order.amount, deal.amount);
        if value_diff_pct > self.config.value_tolerance_percent {
            return None;
        }

        if !self.admits_company(order, deal, value_diff_pct) {
            return None;
        }

        Some(Candidate {
            deal,
            days_diff,
            value_diff_pct,
        })
    }

    /// Company admission, first matching rule wins:
    /// exact id, fuzzy name similarity, or near-exact amount as a weak
    /// candidate. Fuzzy matching needs both companies in the lookup.
    fn admits_company(&self, order: &Order, deal: &Deal, value_diff_pct: f64) -> bool {
        if order.company_id == deal.company_id {
            return true;
        }

        if let (Some(order_company), Some(deal_company)) = (
            self.companies.get(order.company_id.as_str()),
            self.companies.get(deal.company_id.as_str()),
        ) {
            let similarity = company_name_similarity(&order_company.name, &deal_company.name);
            if similarity >= self.config.company_name_similarity_threshold {
                return true;
            }
        }

        value_diff_pct <= NEAR_EXACT_VALUE_PERCENT
    }
}
