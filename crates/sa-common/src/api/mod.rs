//! Wire DTOs for the HTTP boundary.

use serde::{Deserialize, Serialize};

use crate::attribution::Attribution;
use crate::matching::MatchConfig;
use crate::summary::MatchSummary;
use crate::{Company, Deal, Order};

/// One matching batch as submitted by the caller. The config is optional;
/// the server's configuration applies when it is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub companies: Vec<Company>,
    pub deals: Vec<Deal>,
    pub orders: Vec<Order>,
    #[serde(default)]
    pub config: Option<MatchConfig>,
}

/// Attribution buckets plus batch statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matched: Vec<Attribution>,
    pub self_service: Vec<Attribution>,
    pub needs_review: Vec<Attribution>,
    pub summary: MatchSummary,
}
