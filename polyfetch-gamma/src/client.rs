//! Gamma API client
//!
//! Provides the catalog side of Polyfetch: listing, searching and looking up
//! markets on the Polymarket Gamma API. Every record is normalized before it
//! leaves this module.

use async_trait::async_trait;
use polyfetch_core::{CatalogPage, Market, MarketCatalog, PolyfetchError, Upstream};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::normalize::normalize;
use crate::types::{GammaMarket, SearchResponse, GAMMA_API_BASE};

/// Default request timeout for catalog calls
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// Gamma API client
#[derive(Clone)]
pub struct GammaClient {
    client: Client,
    base_url: Url,
}

impl GammaClient {
    /// Create a client against the public Gamma API with the default timeout
    pub fn new() -> Result<Self, PolyfetchError> {
        Self::with_config(GAMMA_API_BASE, DEFAULT_CATALOG_TIMEOUT)
    }

    /// Create a client against a custom base URL
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self, PolyfetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PolyfetchError::config(format!("Invalid Gamma API URL {}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(PolyfetchError::config(format!(
                "Gamma API URL cannot be used as a base: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PolyfetchError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL from path segments appended to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can always take segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL for a page of active markets, highest volume first
    pub(crate) fn markets_url(&self, page: CatalogPage) -> Url {
        let mut url = self.endpoint(&["markets"]);
        url.query_pairs_mut()
            .append_pair("active", "true")
            .append_pair("closed", "false")
            .append_pair("limit", &page.limit.to_string())
            .append_pair("offset", &page.offset.to_string())
            .append_pair("order", "volume")
            .append_pair("ascending", "false");
        url
    }

    /// URL for a free-text search
    pub(crate) fn search_url(&self, query: &str, limit: u32) -> Url {
        let mut url = self.endpoint(&["public-search"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit_per_type", &limit.to_string());
        url
    }

    /// URL for a single market
    pub(crate) fn market_url(&self, id: &str) -> Url {
        self.endpoint(&["markets", id])
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, PolyfetchError> {
        debug!("Fetching Gamma {} from: {}", what, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() { "timed out" } else { "failed" };
            PolyfetchError::transport(
                Upstream::Catalog,
                format!("Request for {} {}: {}", what, reason, e),
            )
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PolyfetchError::not_found(format!("Gamma {} not found", what)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolyfetchError::protocol(
                Upstream::Catalog,
                format!("Gamma API error ({}): {}", status, body),
            ));
        }

        response.json().await.map_err(|e| {
            PolyfetchError::protocol(
                Upstream::Catalog,
                format!("Failed to parse {} response: {}", what, e),
            )
        })
    }

    /// List active, not-closed markets ordered by volume (descending)
    #[instrument(skip(self))]
    pub async fn list_markets(&self, page: CatalogPage) -> Result<Vec<Market>, PolyfetchError> {
        let raw: Vec<GammaMarket> = self.get_json(self.markets_url(page), "markets").await?;

        let markets: Vec<Market> = raw.iter().map(normalize).collect();
        debug!("Fetched {} Gamma markets", markets.len());
        Ok(markets)
    }

    /// Search markets through the catalog's own search index
    ///
    /// Results come back grouped by event; they are flattened in event order.
    #[instrument(skip(self))]
    pub async fn search_markets(&self, query: &str, limit: u32) -> Result<Vec<Market>, PolyfetchError> {
        let response: SearchResponse = self
            .get_json(self.search_url(query, limit), "search results")
            .await?;

        let markets: Vec<Market> = response.into_markets().map(|m| normalize(&m)).collect();
        debug!("Search for {:?} matched {} Gamma markets", query, markets.len());
        Ok(markets)
    }

    /// Get a single market by ID
    #[instrument(skip(self))]
    pub async fn get_market(&self, id: &str) -> Result<Market, PolyfetchError> {
        let raw: GammaMarket = self
            .get_json(self.market_url(id), &format!("market {}", id))
            .await?;

        Ok(normalize(&raw))
    }
}

#[async_trait]
impl MarketCatalog for GammaClient {
    async fn list_markets(&self, page: CatalogPage) -> Result<Vec<Market>, PolyfetchError> {
        GammaClient::list_markets(self, page).await
    }

    async fn search_markets(&self, query: &str, limit: u32) -> Result<Vec<Market>, PolyfetchError> {
        GammaClient::search_markets(self, query, limit).await
    }

    async fn get_market(&self, id: &str) -> Result<Market, PolyfetchError> {
        GammaClient::get_market(self, id).await
    }
}

impl std::fmt::Debug for GammaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
