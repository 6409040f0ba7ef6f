//! Subgraph client
//!
//! Talks to the Polymarket positions subgraph over GraphQL (POST with a JSON
//! body). Pagination lives in [`crate::positions`]; this type only knows how
//! to run a single query.

use async_trait::async_trait;
use polyfetch_core::{LedgerPosition, PolyfetchError, PolyfetchResult, PositionLedger, Upstream};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::positions::{fetch_all_positions, PositionPageSource, PositionsData, POSITIONS_QUERY};

/// Hosted Polymarket PnL subgraph
pub const SUBGRAPH_URL: &str = "https://api.thegraph.com/subgraphs/name/polymarket/pnl-subgraph";

/// Default request timeout for ledger calls (position pages can be slow)
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(60);

/// GraphQL client for the positions subgraph
#[derive(Clone)]
pub struct SubgraphClient {
    client: Client,
    endpoint: Url,
}

impl SubgraphClient {
    pub fn new() -> PolyfetchResult<Self> {
        Self::with_config(SUBGRAPH_URL, DEFAULT_LEDGER_TIMEOUT)
    }

    pub fn with_config(endpoint: &str, timeout: Duration) -> PolyfetchResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| PolyfetchError::config(format!("Invalid subgraph URL {}: {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PolyfetchError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Run a query and decode its `data` payload
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> PolyfetchResult<T> {
        let request = GraphQlRequest { query, variables };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "timed out" } else { "failed" };
                PolyfetchError::transport(Upstream::Ledger, format!("Subgraph request {}: {}", reason, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolyfetchError::protocol(
                Upstream::Ledger,
                format!("Subgraph error ({}): {}", status, body),
            ));
        }

        let envelope: GraphQlResponse<T> = response.json().await.map_err(|e| {
            PolyfetchError::protocol(Upstream::Ledger, format!("Failed to parse subgraph response: {}", e))
        })?;

        envelope.into_data()
    }
}

#[async_trait]
impl PositionPageSource for SubgraphClient {
    async fn fetch_page(
        &self,
        market_id: &str,
        first: usize,
        skip: usize,
    ) -> PolyfetchResult<Vec<LedgerPosition>> {
        debug!(market_id, first, skip, "Fetching position page");

        let variables = serde_json::json!({
            "marketId": market_id,
            "first": first,
            "skip": skip,
        });

        let data: PositionsData = self.query(POSITIONS_QUERY, variables).await?;
        Ok(data.positions.into_iter().map(LedgerPosition::from).collect())
    }
}

#[async_trait]
impl PositionLedger for SubgraphClient {
    #[instrument(skip(self))]
    async fn fetch_positions(&self, condition_id: &str) -> PolyfetchResult<Vec<LedgerPosition>> {
        fetch_all_positions(self, condition_id).await
    }
}

impl std::fmt::Debug for SubgraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubgraphClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}
