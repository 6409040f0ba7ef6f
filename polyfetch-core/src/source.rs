//! Upstream source abstractions
//!
//! The service layer talks to the catalog and the ledger through these traits
//! so the concrete HTTP clients can be swapped out (in tests, for instance).

use async_trait::async_trait;

use crate::error::PolyfetchResult;
use crate::market::Market;
use crate::position::LedgerPosition;

/// Query for a page of catalog markets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogPage {
    pub limit: u32,
    pub offset: u32,
}

/// Source of normalized market metadata
#[async_trait]
pub trait MarketCatalog: Send + Sync {
    /// Active, not-closed markets ordered by volume (descending)
    async fn list_markets(&self, page: CatalogPage) -> PolyfetchResult<Vec<Market>>;

    /// Free-text search resolved by the catalog's own search index
    async fn search_markets(&self, query: &str, limit: u32) -> PolyfetchResult<Vec<Market>>;

    /// A single market by catalog identifier
    async fn get_market(&self, id: &str) -> PolyfetchResult<Market>;
}

/// Source of betting positions
#[async_trait]
pub trait PositionLedger: Send + Sync {
    /// Every position recorded for a market, keyed by condition identifier
    async fn fetch_positions(&self, condition_id: &str) -> PolyfetchResult<Vec<LedgerPosition>>;
}
