use super::candidates::{
    days_between, value_diff_percent, Candidate, CandidateFilter, NEAR_EXACT_VALUE_PERCENT,
};
use super::config::{MatchConfig, ScoringPolicy};
use super::scoring::Scorer;
use super::CompanyLookup;
use crate::attribution::{Attribution, AttributionMethod, MatchDiagnostics};
use crate::{Deal, Order};

/// Confidence multiplier applied when a match is found through the
/// temporal-only fallback instead of the full filter.
const TEMPORAL_FALLBACK_PENALTY: f64 = 0.8;

const REASON_LOW_AMOUNT: &str = "Order amount below self-service threshold";
const REASON_NO_HISTORY: &str = "No won deal history for company";
const REASON_NO_MATCH: &str = "No suitable deal match found within time window";

/// Decides the attribution for one order. States are evaluated in order and
/// the first applicable terminal state wins.
pub struct MatchSelector<'a> {
    config: &'a MatchConfig,
    companies: &'a CompanyLookup<'a>,
}

impl<'a> MatchSelector<'a> {
    pub fn new(config: &'a MatchConfig, companies: &'a CompanyLookup<'a>) -> Self {
        Self { config, companies }
    }

    pub fn decide(&self, order: &Order, won_deals: &[&Deal]) -> Attribution {
        if order.amount < self.config.self_service_threshold {
            return Attribution::self_service(order, REASON_LOW_AMOUNT);
        }

        if !won_deals.iter().any(|d| d.company_id == order.company_id) {
            return Attribution::self_service(order, REASON_NO_HISTORY);
        }

        let filter = CandidateFilter::new(self.config, self.companies);
        let candidates = filter.filter_candidates(order, won_deals);

        if candidates.is_empty() {
            if self.config.scoring_policy == ScoringPolicy::DecayBonus {
                if let Some(attribution) = self.temporal_fallback(order, won_deals) {
                    return attribution;
                }
            }
            return Attribution::self_service(order, REASON_NO_MATCH);
        }

        self.select_best(order, &candidates)
    }

    /// Scores every candidate and keeps the maximum; ties go to the first
    /// candidate in input order.
    fn select_best(&self, order: &Order, candidates: &[Candidate<'_>]) -> Attribution {
        let scorer = Scorer::new(self.config, self.companies);

        let mut best = &candidates[0];
        let mut best_score = scorer.score(order, best, candidates.len());
        for candidate in &candidates[1..] {
            let score = scorer.score(order, candidate, candidates.len());
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }

        let method = if best.value_diff_pct <= NEAR_EXACT_VALUE_PERCENT
            && best.days_diff.abs() <= 14
        {
            AttributionMethod::TemporalValue
        } else {
            AttributionMethod::TemporalOnly
        };

        Attribution::for_deal(
            order,
            best.deal,
            method,
            best_score,
            self.config.confidence_threshold,
            false,
            MatchDiagnostics {
                days_diff: best.days_diff,
                value_diff_pct: best.value_diff_pct,
                candidates_count: candidates.len(),
                company_match: order.company_id == best.deal.company_id,
            },
        )
    }

    /// When the value filter eliminated everything, fall back to the
    /// company's won deals inside the pure temporal window: take the most
    /// recently closed, apply the fallback penalty, and force review.
    fn temporal_fallback(&self, order: &Order, won_deals: &[&Deal]) -> Option<Attribution> {
        let pool: Vec<&Deal> = won_deals
            .iter()
            .filter(|d| d.company_id == order.company_id)
            .filter(|d| {
                d.close_date.is_some_and(|close| {
                    self.config
                        .temporal_window
                        .contains(days_between(order.order_date, close))
                })
            })
            .copied()
            .collect();

        let deal = pool
            .iter()
            .max_by_key(|d| d.close_date)
            .copied()?;

        let days_diff = days_between(order.order_date, deal.close_date?);
        let value_diff_pct = value_diff_percent(order.amount, deal.amount);

        let scorer = Scorer::new(self.config, self.companies);
        let score =
            scorer.decay_bonus_score(days_diff, value_diff_pct, false) * TEMPORAL_FALLBACK_PENALTY;

        Some(Attribution::for_deal(
            order,
            deal,
            AttributionMethod::TemporalOnly,
            score,
            self.config.confidence_threshold,
            true,
            MatchDiagnostics {
                days_diff,
                value_diff_pct,
                candidates_count: pool.len(),
                company_match: true,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::{Company, DealStatus};

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn deal(id: &str, amount: f64, close: DateTime<Utc>) -> Deal {
        Deal {
            id: id.into(),
            company_id: "c1".into(),
            sales_rep_id: "rep_alice".into(),
            sales_rep_name: "Alice Johnson".into(),
            amount,
            status: DealStatus::Won,
            close_date: Some(close),
            created_at: None,
            products: None,
        }
    }

    fn order(amount: f64, order_date: DateTime<Utc>) -> Order {
        Order {
            id: "order_001".into(),
            company_id: "c1".into(),
            amount,
            order_date,
            products: None,
        }
    }

    fn companies() -> Vec<Company> {
        vec![Company {
            id: "c1".into(),
            name: "Acme".into(),
            created_at: None,
        }]
    }

    fn lookup(companies: &[Company]) -> CompanyLookup<'_> {
        companies
            .iter()
            .map(|c| (c.id.as_str(), c))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn close_temporal_and_value_match_is_attributed() {
        let config = MatchConfig::default();
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let deal = deal("deal_001", 10000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(10200.0, date(2024, 6, 15)), &[&deal]);

        assert_eq!(attribution.attribution_method, AttributionMethod::TemporalValue);
        assert_eq!(attribution.deal_id.as_deref(), Some("deal_001"));
        assert_eq!(attribution.sales_rep_id.as_deref(), Some("rep_alice"));
        assert!(attribution.confidence_score > 70.0);
        assert!(!attribution.needs_review);
    }

    #[test]
    fn low_amount_order_is_self_service() {
        let config = MatchConfig::default();
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let deal = deal("deal_001", 10000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(300.0, date(2024, 6, 15)), &[&deal]);

        assert_eq!(attribution.attribution_method, AttributionMethod::SelfService);
        assert_eq!(attribution.confidence_score, 100.0);
        assert!(!attribution.needs_review);
    }

    #[test]
    fn company_without_won_deals_is_self_service() {
        let config = MatchConfig::default();
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let attribution = selector.decide(&order(5000.0, date(2024, 6, 15)), &[]);

        assert_eq!(attribution.attribution_method, AttributionMethod::SelfService);
        assert_eq!(
            attribution.matching_metadata["reason"],
            serde_json::json!(REASON_NO_HISTORY)
        );
    }

    #[test]
    fn no_candidate_in_window_is_self_service() {
        let mut config = MatchConfig::default();
        config.scoring_policy = ScoringPolicy::Weighted;
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let stale = deal("deal_001", 10000.0, date(2023, 1, 1));
        let attribution = selector.decide(&order(10000.0, date(2024, 6, 15)), &[&stale]);

        assert_eq!(attribution.attribution_method, AttributionMethod::SelfService);
        assert_eq!(
            attribution.matching_metadata["reason"],
            serde_json::json!(REASON_NO_MATCH)
        );
    }

    #[test]
    fn large_value_gap_falls_back_to_temporal_only() {
        let config = MatchConfig::default();
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        // 200% value difference: rejected by the value filter, rescued by the
        // temporal-only fallback with forced review.
        let deal = deal("deal_001", 5000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(15000.0, date(2024, 6, 15)), &[&deal]);

        assert_eq!(attribution.attribution_method, AttributionMethod::TemporalOnly);
        assert!(attribution.needs_review);
        assert!(attribution.confidence_score < 70.0);
    }

    #[test]
    fn fallback_prefers_most_recently_closed_deal() {
        let config = MatchConfig::default();
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let older = deal("deal_old", 5000.0, date(2024, 5, 1));
        let newer = deal("deal_new", 5000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(15000.0, date(2024, 6, 15)), &[&older, &newer]);

        assert_eq!(attribution.deal_id.as_deref(), Some("deal_new"));
        assert!(attribution.needs_review);
    }

    #[test]
    fn weighted_policy_never_uses_fallback() {
        let mut config = MatchConfig::defaults_for(ScoringPolicy::Weighted);
        config.value_tolerance_percent = 20.0;
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let deal = deal("deal_001", 5000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(15000.0, date(2024, 6, 15)), &[&deal]);

        assert_eq!(attribution.attribution_method, AttributionMethod::SelfService);
    }

    #[test]
    fn weighted_low_score_is_flagged_for_review() {
        let mut config = MatchConfig::defaults_for(ScoringPolicy::Weighted);
        config.value_tolerance_percent = 300.0;
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let deal = deal("deal_001", 5000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(15000.0, date(2024, 6, 15)), &[&deal]);

        // Value term collapses at a 200% difference; never silently matched.
        assert_eq!(attribution.attribution_method, AttributionMethod::TemporalOnly);
        assert!(attribution.needs_review);
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let config = MatchConfig::default();
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let first = deal("deal_first", 10000.0, date(2024, 6, 1));
        let second = deal("deal_second", 10000.0, date(2024, 6, 1));
        let attribution = selector.decide(&order(10000.0, date(2024, 6, 10)), &[&first, &second]);

        assert_eq!(attribution.deal_id.as_deref(), Some("deal_first"));
        assert_eq!(
            attribution.matching_metadata["candidates_count"],
            serde_json::json!(2)
        );
    }

    #[test]
    fn weighted_policy_prefers_product_overlap() {
        let mut config = MatchConfig::defaults_for(ScoringPolicy::Weighted);
        config.value_tolerance_percent = 20.0;
        let companies = companies();
        let lookup = lookup(&companies);
        let selector = MatchSelector::new(&config, &lookup);

        let mut crm = deal("deal_crm", 10000.0, date(2024, 6, 1));
        crm.products = Some(vec!["CRM".into()]);
        let mut hr = deal("deal_hr", 10000.0, date(2024, 6, 1));
        hr.products = Some(vec!["HR System".into(), "Support".into()]);

        let mut order = order(10200.0, date(2024, 6, 15));
        order.products = Some(vec!["HR System".into(), "Support".into()]);

        let attribution = selector.decide(&order, &[&crm, &hr]);
        assert_eq!(attribution.deal_id.as_deref(), Some("deal_hr"));
        assert!(!attribution.needs_review);
    }
}
