use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{Deal, Order};

/// How an order was attributed. `Manual` exists for externally entered
/// corrections and is never produced by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    TemporalValue,
    TemporalOnly,
    SelfService,
    Manual,
}

/// Diagnostics recorded alongside a deal-backed attribution.
#[derive(Debug, Clone, Copy)]
pub struct MatchDiagnostics {
    pub days_diff: i64,
    pub value_diff_pct: f64,
    pub candidates_count: usize,
    /// Exact company id equality between order and deal.
    pub company_match: bool,
}

/// The decision record for one order. Built exactly once, immutable after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub order_id: String,
    pub deal_id: Option<String>,
    pub sales_rep_id: Option<String>,
    pub sales_rep_name: Option<String>,
    pub attribution_method: AttributionMethod,
    pub confidence_score: f64,
    pub needs_review: bool,
    #[serde(default)]
    pub matching_metadata: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl Attribution {
    /// Attribution of an order to a deal. Clamps the confidence to [0, 100]
    /// and derives `needs_review` from the threshold unless the caller
    /// forces it (the temporal-only fallback always does).
    pub fn for_deal(
        order: &Order,
        deal: &Deal,
        method: AttributionMethod,
        confidence: f64,
        confidence_threshold: f64,
        force_review: bool,
        diagnostics: MatchDiagnostics,
    ) -> Self {
        let confidence = confidence.clamp(0.0, 100.0);

        let mut metadata = Map::new();
        metadata.insert(
            "days_difference".into(),
            json!(diagnostics.days_diff.unsigned_abs()),
        );
        metadata.insert(
            "value_difference_percent".into(),
            json!(round2(diagnostics.value_diff_pct)),
        );
        metadata.insert("order_amount".into(), json!(order.amount));
        metadata.insert("deal_amount".into(), json!(deal.amount));
        metadata.insert("candidates_count".into(), json!(diagnostics.candidates_count));
        metadata.insert("company_match".into(), json!(diagnostics.company_match));

        Self {
            order_id: order.id.clone(),
            deal_id: Some(deal.id.clone()),
            sales_rep_id: Some(deal.sales_rep_id.clone()),
            sales_rep_name: Some(deal.sales_rep_name.clone()),
            attribution_method: method,
            confidence_score: confidence,
            needs_review: force_review || confidence < confidence_threshold,
            matching_metadata: metadata,
            timestamp: Utc::now(),
        }
    }

    /// No sales-rep influence: low amount or no plausible deal. Full
    /// confidence, never reviewed, human-readable reason in the metadata.
    pub fn self_service(order: &Order, reason: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("reason".into(), json!(reason));
        metadata.insert("order_amount".into(), json!(order.amount));

        Self {
            order_id: order.id.clone(),
            deal_id: None,
            sales_rep_id: None,
            sales_rep_name: None,
            attribution_method: AttributionMethod::SelfService,
            confidence_score: 100.0,
            needs_review: false,
            matching_metadata: metadata,
            timestamp: Utc::now(),
        }
    }

    pub fn is_self_service(&self) -> bool {
        self.attribution_method == AttributionMethod::SelfService
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
