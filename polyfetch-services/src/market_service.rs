//! Market service: the query façade over catalog and stats

use chrono::{DateTime, Utc};
use polyfetch_core::{CatalogPage, DerivedStats, Market, MarketCatalog, PolyfetchError, PolyfetchResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::stats::StatsEngine;

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 100;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Clamp a requested limit into `(0, max]`, anything else is `default`
fn bounded_limit(requested: Option<i64>, default: u32, max: u32) -> u32 {
    match requested {
        Some(limit) if limit > 0 && limit <= i64::from(max) => limit as u32,
        _ => default,
    }
}

/// Paging for market listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
}

impl ListQuery {
    /// Build from raw request values, falling back to defaults when out of range
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: bounded_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
            offset: offset.and_then(|o| u32::try_from(o).ok()).unwrap_or(0),
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl From<ListQuery> for CatalogPage {
    fn from(query: ListQuery) -> Self {
        CatalogPage {
            limit: query.limit,
            offset: query.offset,
        }
    }
}

/// A free-text market search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub limit: u32,
}

impl SearchQuery {
    /// Validate a search; a missing or blank query is rejected
    pub fn new(query: Option<&str>, limit: Option<i64>) -> PolyfetchResult<Self> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(PolyfetchError::invalid_request("Search query 'q' is required"));
        }

        Ok(Self {
            query: query.to_string(),
            limit: bounded_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT),
        })
    }
}

/// Drop markets that ended more than the grace period before `now`
pub fn filter_expired(markets: Vec<Market>, now: DateTime<Utc>) -> Vec<Market> {
    let before = markets.len();
    let kept: Vec<Market> = markets.into_iter().filter(|m| !m.is_expired_at(now)).collect();

    if kept.len() < before {
        debug!("Filtered out {} expired markets", before - kept.len());
    }
    kept
}

/// Service for listing, searching and describing markets
#[derive(Clone)]
pub struct MarketService {
    catalog: Arc<dyn MarketCatalog>,
    stats: StatsEngine,
}

impl MarketService {
    pub fn new(catalog: Arc<dyn MarketCatalog>, stats: StatsEngine) -> Self {
        Self { catalog, stats }
    }

    pub fn stats_engine(&self) -> &StatsEngine {
        &self.stats
    }

    /// Active markets by volume, excluding expired ones
    ///
    /// Filtering happens after paging, so a page may hold fewer than `limit`
    /// markets.
    #[instrument(skip(self))]
    pub async fn list_markets(&self, query: ListQuery) -> PolyfetchResult<Vec<Market>> {
        let markets = self.catalog.list_markets(query.into()).await?;
        let markets = filter_expired(markets, Utc::now());

        info!("Listing {} markets", markets.len());
        Ok(markets)
    }

    /// Search markets by free text, excluding expired ones
    #[instrument(skip(self))]
    pub async fn search_markets(&self, query: &SearchQuery) -> PolyfetchResult<Vec<Market>> {
        let markets = self.catalog.search_markets(&query.query, query.limit).await?;

        let mut markets = filter_expired(markets, Utc::now());
        markets.truncate(query.limit as usize);

        info!("Search for {:?} returned {} markets", query.query, markets.len());
        Ok(markets)
    }

    /// A single market, expired or not
    #[instrument(skip(self))]
    pub async fn get_market(&self, id: &str) -> PolyfetchResult<Market> {
        self.catalog.get_market(id).await
    }

    /// Betting distribution for a market
    ///
    /// Fails only if the market itself cannot be fetched.
    #[instrument(skip(self))]
    pub async fn get_market_stats(&self, id: &str) -> PolyfetchResult<DerivedStats> {
        let market = self.catalog.get_market(id).await?;
        Ok(self.stats.compute_stats(&market).await)
    }
}
