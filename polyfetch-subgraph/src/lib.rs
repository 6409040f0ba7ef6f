//! Polymarket position ledger integration for Polyfetch
//!
//! This crate reads betting positions from the Polymarket subgraph, a GraphQL
//! index of on-chain activity. Positions feed the ledger-derived statistics in
//! `polyfetch-services`.

pub mod client;
pub mod graphql;
pub mod positions;

pub use client::{SubgraphClient, DEFAULT_LEDGER_TIMEOUT, SUBGRAPH_URL};
pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use positions::{fetch_all_positions, PositionPageSource, MAX_SKIP, PAGE_SIZE};
