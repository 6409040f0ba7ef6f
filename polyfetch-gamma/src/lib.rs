//! Polymarket Gamma integration for Polyfetch
//!
//! This crate provides a client for the Polymarket Gamma API, the market
//! catalog, which serves market metadata without requiring authentication.
//! Raw records are converted into canonical [`polyfetch_core::Market`]
//! values by [`normalize()`].

pub mod client;
pub mod normalize;
pub mod types;

pub use client::{GammaClient, DEFAULT_CATALOG_TIMEOUT};
pub use normalize::{normalize, normalize_with_report, DegradedField};
pub use types::{GammaEvent, GammaMarket, SearchResponse, GAMMA_API_BASE};
