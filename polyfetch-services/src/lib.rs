//! Business logic services for Polyfetch
//!
//! This crate sits between the HTTP layer and the upstream clients: it
//! applies the listing policy (paging bounds, expiry filtering) and derives
//! betting statistics from whichever source is available.

pub mod market_service;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use market_service::{filter_expired, ListQuery, MarketService, SearchQuery};
pub use stats::{derive_from_ledger, derive_from_prices, select_popular, OutcomeAggregate, StatsEngine};
