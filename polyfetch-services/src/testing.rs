//! In-process upstream fakes for service tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use polyfetch_core::{
    CatalogPage, LedgerPosition, Market, MarketCatalog, PolyfetchError, PolyfetchResult,
    PositionLedger, Upstream,
};
use std::sync::{Arc, Mutex};

pub(crate) fn market(id: &str, outcomes: &[&str], prices: &[&str], end_date: Option<DateTime<Utc>>) -> Market {
    Market {
        id: id.to_string(),
        condition_id: format!("0xcond-{}", id),
        question: format!("Question {}?", id),
        description: String::new(),
        outcomes: outcomes.iter().map(|s| s.to_string()).collect(),
        outcome_prices: prices.iter().map(|s| s.to_string()).collect(),
        end_date,
        volume: "1000".to_string(),
        liquidity: "100".to_string(),
        active: true,
    }
}

pub(crate) fn position(user: &str, outcome: &str) -> LedgerPosition {
    LedgerPosition {
        id: format!("{}-{}", user, outcome),
        user: user.to_string(),
        outcome: outcome.to_string(),
        market: "0xcond".to_string(),
        quantity_bought: "1".to_string(),
        quantity_sold: "0".to_string(),
    }
}

/// Ledger returning a fixed set of positions, or failing
pub(crate) struct FakeLedger {
    positions: Option<Vec<LedgerPosition>>,
    calls: Mutex<Vec<String>>,
}

impl FakeLedger {
    pub(crate) fn with_positions(positions: Vec<LedgerPosition>) -> Arc<Self> {
        Arc::new(Self {
            positions: Some(positions),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            positions: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Condition IDs requested so far
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PositionLedger for FakeLedger {
    async fn fetch_positions(&self, condition_id: &str) -> PolyfetchResult<Vec<LedgerPosition>> {
        self.calls.lock().unwrap().push(condition_id.to_string());
        self.positions
            .clone()
            .ok_or_else(|| PolyfetchError::transport(Upstream::Ledger, "timed out"))
    }
}

/// Catalog serving canned markets and recording the pages it was asked for
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub(crate) markets: Vec<Market>,
    pub(crate) search_results: Vec<Market>,
    pub(crate) unavailable: bool,
    pub(crate) pages: Mutex<Vec<CatalogPage>>,
    pub(crate) searches: Mutex<Vec<(String, u32)>>,
}

impl FakeCatalog {
    fn check_available(&self) -> PolyfetchResult<()> {
        if self.unavailable {
            return Err(PolyfetchError::protocol(Upstream::Catalog, "Gamma API error (502)"));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketCatalog for FakeCatalog {
    async fn list_markets(&self, page: CatalogPage) -> PolyfetchResult<Vec<Market>> {
        self.pages.lock().unwrap().push(page);
        self.check_available()?;
        Ok(self.markets.clone())
    }

    async fn search_markets(&self, query: &str, limit: u32) -> PolyfetchResult<Vec<Market>> {
        self.searches.lock().unwrap().push((query.to_string(), limit));
        self.check_available()?;
        Ok(self.search_results.clone())
    }

    async fn get_market(&self, id: &str) -> PolyfetchResult<Market> {
        self.check_available()?;
        self.markets
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| PolyfetchError::not_found(format!("Gamma market {} not found", id)))
    }
}
