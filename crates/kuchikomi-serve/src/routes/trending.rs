//! Trending endpoint ranking discussion threads by size.

use axum::extract::State;
use axum::Json;
use kuchikomi_core::{TrendingIndex, TrendingThread};
use serde::Serialize;

use crate::state::AppState;

/// How many threads `GET /trending` returns.
const TRENDING_LIMIT: usize = 10;

/// Trending response body.
#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Vec<TrendingThread>,
}

/// `GET /trending`
///
/// Returns the busiest discussion threads, descending by comment count.
/// Recomputed from the store on each call; never fails.
pub async fn trending(State(state): State<AppState>) -> Json<TrendingResponse> {
    let trending = TrendingIndex::new(&state.store).top(TRENDING_LIMIT);
    Json(TrendingResponse { trending })
}
