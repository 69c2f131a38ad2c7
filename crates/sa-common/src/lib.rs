pub mod api;
pub mod attribution;
pub mod logging;
pub mod matching;
pub mod similarity;
pub mod summary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a sales opportunity. Only `Won` deals participate in
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    Open,
    Won,
    Lost,
}

// Commonly used data models for matching functions. Supplied per batch,
// read-only for the duration of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub company_id: String,
    pub sales_rep_id: String,
    pub sales_rep_name: String,
    pub amount: f64,
    pub status: DealStatus,
    /// Deals without a close date never become candidates.
    #[serde(default)]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Products/services sold in the deal.
    #[serde(default)]
    pub products: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub company_id: String,
    pub amount: f64,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub products: Option<Vec<String>>,
}

impl Deal {
    pub fn is_won(&self) -> bool {
        self.status == DealStatus::Won
    }
}
