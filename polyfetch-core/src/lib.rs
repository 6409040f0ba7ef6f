//! Core types for Polyfetch
//!
//! This crate defines the shared data structures used across the workspace:
//! the canonical market representation, ledger positions, derived statistics,
//! the parse-with-fallback helpers and the upstream source traits.

pub mod error;
pub mod market;
pub mod parse;
pub mod platform;
pub mod position;
pub mod source;

pub use error::{PolyfetchError, PolyfetchResult};
pub use market::{DerivedStats, Market, MarketStats, OutcomeStat, StatsSource, EXPIRY_GRACE_HOURS};
pub use parse::Parsed;
pub use platform::Upstream;
pub use position::LedgerPosition;
pub use source::{CatalogPage, MarketCatalog, PositionLedger};
