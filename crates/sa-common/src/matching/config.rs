use serde::{Deserialize, Serialize};

/// Allowed range of days between a deal's close date and an order's date.
///
/// `days_diff = order_date - close_date`, so a deal that closed before the
/// order has a positive diff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemporalWindow {
    Symmetric {
        days: i64,
    },
    /// Deal may close up to `days_before` days before the order and up to
    /// `days_after` days after it.
    Asymmetric { days_before: i64, days_after: i64 },
}

impl TemporalWindow {
    pub fn contains(&self, days_diff: i64) -> bool {
        match *self {
            TemporalWindow::Symmetric { days } => days_diff.abs() <= days,
            TemporalWindow::Asymmetric {
                days_before,
                days_after,
            } => -days_after <= days_diff && days_diff <= days_before,
        }
    }
}

/// Confidence scoring strategy. The two variants are mutually exclusive and
/// selected per batch by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Four weighted signals: product overlap, value closeness, temporal
    /// proximity, company identity.
    Weighted,
    /// Start at 100, decay by days and value difference, bonus when a single
    /// candidate survived filtering. For environments without product data.
    DecayBonus,
}

/// Tunable thresholds for one matching batch. Constructed once by the caller
/// and immutable while matching runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub temporal_window: TemporalWindow,
    pub value_tolerance_percent: f64,
    /// Orders below this amount are self-service.
    pub self_service_threshold: f64,
    /// Attributions scoring below this need manual review.
    pub confidence_threshold: f64,
    pub temporal_decay_per_day: f64,
    pub value_penalty_per_5_percent: f64,
    pub unique_deal_bonus: f64,
    pub company_name_similarity_threshold: f64,
    pub scoring_policy: ScoringPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::defaults_for(ScoringPolicy::DecayBonus)
    }
}

impl MatchConfig {
    /// Documented defaults per policy. The weighted policy runs with a wider
    /// value tolerance because its value term already penalizes distance.
    pub fn defaults_for(policy: ScoringPolicy) -> Self {
        Self {
            temporal_window: TemporalWindow::Symmetric { days: 90 },
            value_tolerance_percent: match policy {
                ScoringPolicy::Weighted => 20.0,
                ScoringPolicy::DecayBonus => 10.0,
            },
            self_service_threshold: 500.0,
            confidence_threshold: 70.0,
            temporal_decay_per_day: 1.0,
            value_penalty_per_5_percent: 10.0,
            unique_deal_bonus: 30.0,
            company_name_similarity_threshold: 0.6,
            scoring_policy: policy,
        }
    }

    /// Read configuration from `SA_*` environment variables, falling back to
    /// the policy defaults for anything unset.
    pub fn from_env() -> Self {
        let policy = match std::env::var("SA_SCORING_POLICY").ok().as_deref() {
            Some("weighted") => ScoringPolicy::Weighted,
            Some("decay_bonus") | None => ScoringPolicy::DecayBonus,
            Some(other) => {
                tracing::warn!(policy = other, "unknown SA_SCORING_POLICY; using decay_bonus");
                ScoringPolicy::DecayBonus
            }
        };
        let defaults = Self::defaults_for(policy);

        let temporal_window = match (
            env_parse::<i64>("SA_TIME_WINDOW_DAYS_BEFORE"),
            env_parse::<i64>("SA_TIME_WINDOW_DAYS_AFTER"),
        ) {
            (Some(days_before), Some(days_after)) => TemporalWindow::Asymmetric {
                days_before,
                days_after,
            },
            _ => env_parse("SA_TIME_WINDOW_DAYS")
                .map(|days| TemporalWindow::Symmetric { days })
                .unwrap_or(defaults.temporal_window),
        };

        Self {
            temporal_window,
            value_tolerance_percent: env_parse("SA_VALUE_TOLERANCE_PERCENT")
                .unwrap_or(defaults.value_tolerance_percent),
            self_service_threshold: env_parse("SA_SELF_SERVICE_THRESHOLD")
                .unwrap_or(defaults.self_service_threshold),
            confidence_threshold: env_parse("SA_CONFIDENCE_THRESHOLD")
                .unwrap_or(defaults.confidence_threshold),
            temporal_decay_per_day: env_parse("SA_TEMPORAL_DECAY_PER_DAY")
                .unwrap_or(defaults.temporal_decay_per_day),
            value_penalty_per_5_percent: env_parse("SA_VALUE_PENALTY_PER_5_PERCENT")
                .unwrap_or(defaults.value_penalty_per_5_percent),
            unique_deal_bonus: env_parse("SA_UNIQUE_DEAL_BONUS")
                .unwrap_or(defaults.unique_deal_bonus),
            company_name_similarity_threshold: env_parse("SA_COMPANY_NAME_SIMILARITY_THRESHOLD")
                .unwrap_or(defaults.company_name_similarity_threshold),
            scoring_policy: policy,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
