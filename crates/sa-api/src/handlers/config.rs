use axum::{extract::State, Json};

use sa_common::matching::MatchConfig;

use crate::SharedState;

/// Effective matching configuration for this server instance.
pub async fn get_config(State(state): State<SharedState>) -> Json<MatchConfig> {
    Json(state.match_config.clone())
}
