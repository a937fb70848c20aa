//! Search cache API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use readnook_core::CacheStats;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// GET /api/v1/cache/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.search().cache().stats())
}

/// DELETE /api/v1/cache
///
/// Drop every cached search result.
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    let cache = state.search().cache();
    let removed = cache.len();
    cache.clear();
    info!("Search cache cleared ({} entries)", removed);

    Json(SuccessResponse {
        message: format!("Cleared {} cached searches", removed),
    })
}
