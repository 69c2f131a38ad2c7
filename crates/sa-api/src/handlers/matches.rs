use axum::{extract::State, Json};
use tracing::info;

use sa_common::api::{MatchRequest, MatchResponse};
use sa_common::matching::MatchingEngine;
use sa_common::summary::MatchSummary;

use crate::error::ApiError;
use crate::SharedState;

/// Runs one matching batch. The whole batch succeeds or fails as a unit: an
/// unexpected fault inside the engine surfaces as a single internal error,
/// never a partial result.
pub async fn match_orders(
    State(state): State<SharedState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let config = request
        .config
        .clone()
        .unwrap_or_else(|| state.match_config.clone());

    info!(
        orders = request.orders.len(),
        deals = request.deals.len(),
        companies = request.companies.len(),
        policy = ?config.scoring_policy,
        "received match request"
    );

    // spawn_blocking keeps a large batch off the async workers and turns a
    // panicking batch into a JoinError instead of tearing down the task.
    let outcome = tokio::task::spawn_blocking(move || {
        MatchingEngine::new(config).match_orders(&request.companies, &request.deals, &request.orders)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("matching failed: {err}")))?;

    let summary = MatchSummary::from_outcome(&outcome);

    info!(
        total = summary.total_orders,
        matched = summary.matched_count,
        self_service = summary.self_service_count,
        needs_review = summary.needs_review_count,
        match_rate = summary.match_rate_percent,
        "matching complete"
    );

    Ok(Json(MatchResponse {
        matched: outcome.matched,
        self_service: outcome.self_service,
        needs_review: outcome.needs_review,
        summary,
    }))
}
