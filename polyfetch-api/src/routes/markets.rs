//! Market-related API endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use polyfetch_core::{Market, MarketStats};
use polyfetch_services::{ListQuery, SearchQuery};
use serde::Deserialize;
use tracing::info;

use super::{ApiResponse, ApiResult};
use crate::AppState;

/// Query parameters for listing markets
///
/// Kept as raw strings: malformed numbers fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListMarketsParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Query parameters for searching markets
#[derive(Debug, Deserialize)]
pub struct SearchMarketsParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Create market routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/markets", get(list_markets))
        .route("/markets/search", get(search_markets))
        .route("/market/{id}", get(get_market))
        .route("/market/{id}/stats", get(get_market_stats))
}

/// List active markets by volume
async fn list_markets(
    State(state): State<AppState>,
    Query(params): Query<ListMarketsParams>,
) -> ApiResult<Vec<Market>> {
    let query = ListQuery::new(
        parse_int(params.limit.as_deref()),
        parse_int(params.offset.as_deref()),
    );
    info!("Listing markets: limit={} offset={}", query.limit, query.offset);

    let markets = state.market_service.list_markets(query).await?;
    Ok(ApiResponse::ok(markets))
}

/// Free-text market search
async fn search_markets(
    State(state): State<AppState>,
    Query(params): Query<SearchMarketsParams>,
) -> ApiResult<Vec<Market>> {
    let query = SearchQuery::new(params.q.as_deref(), parse_int(params.limit.as_deref()))?;
    info!("Searching markets for {:?}", query.query);

    let markets = state.market_service.search_markets(&query).await?;
    Ok(ApiResponse::ok(markets))
}

async fn get_market(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Market> {
    info!("Getting market: {}", id);
    let market = state.market_service.get_market(&id).await?;
    Ok(ApiResponse::ok(market))
}

async fn get_market_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MarketStats> {
    info!("Getting stats for market: {}", id);
    let derived = state.market_service.get_market_stats(&id).await?;
    Ok(ApiResponse::ok(derived.into_stats()))
}
