//! Gamma API response types
//!
//! These types mirror the Polymarket Gamma API responses and are converted
//! to polyfetch-core types (see [`crate::normalize`]) for use in the service.

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for the Polymarket Gamma API
pub const GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

/// Deserialize a decimal that upstream sends either as a string or a number
///
/// Numbers are kept as their JSON text so nothing is lost in conversion.
fn deserialize_decimal_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(s)) => Some(s),
        Some(StringOrNumber::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

/// A raw market record from the Gamma API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    /// Unique identifier
    #[serde(default)]
    pub id: String,

    /// Condition ID (market key on the ledger)
    #[serde(default)]
    pub condition_id: Option<String>,

    #[serde(default)]
    pub question: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Outcomes as a JSON array inside a string (e.g., "[\"Yes\", \"No\"]")
    #[serde(default)]
    pub outcomes: Option<String>,

    /// Outcome prices as a JSON array inside a string (e.g., "[\"0.65\", \"0.35\"]")
    #[serde(default)]
    pub outcome_prices: Option<String>,

    /// End date, format varies by record age
    #[serde(default)]
    pub end_date_iso: Option<String>,

    /// Full end timestamp, present on most newer records
    #[serde(default)]
    pub end_date: Option<String>,

    /// Total volume
    #[serde(default, deserialize_with = "deserialize_decimal_string")]
    pub volume: Option<String>,

    /// Total liquidity
    #[serde(default, deserialize_with = "deserialize_decimal_string")]
    pub liquidity: Option<String>,

    /// Whether the market is active
    #[serde(default)]
    pub active: Option<bool>,

    /// Whether the market is closed
    #[serde(default)]
    pub closed: Option<bool>,
}

/// An event from the search API (groups several markets)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaEvent {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub active: Option<bool>,

    #[serde(default)]
    pub closed: Option<bool>,

    /// Associated markets
    #[serde(default)]
    pub markets: Vec<GammaMarket>,
}

/// Response from GET /public-search
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub events: Vec<GammaEvent>,
}

impl SearchResponse {
    /// All markets across all events, in event order
    pub fn into_markets(self) -> impl Iterator<Item = GammaMarket> {
        self.events.into_iter().flat_map(|e| e.markets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_deserialization() {
        let json = r#"{
            "id": "253591",
            "conditionId": "0xdd22472e552920b8438158ea7238bfadfa4f736aa4cee91a6b86c39ead110917",
            "question": "Will BTC hit 100k?",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.7\", \"0.3\"]",
            "endDateIso": "2025-12-31",
            "volume": "1234.5",
            "liquidity": 987.25,
            "active": true,
            "closed": false,
            "clobTokenIds": "[\"1\", \"2\"]"
        }"#;

        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.id, "253591");
        assert_eq!(market.volume.as_deref(), Some("1234.5"));
        assert_eq!(market.liquidity.as_deref(), Some("987.25"));
        assert_eq!(market.end_date_iso.as_deref(), Some("2025-12-31"));
        assert_eq!(market.closed, Some(false));
        assert!(market.description.is_none());
    }

    #[test]
    fn test_sparse_market_deserialization() {
        let market: GammaMarket = serde_json::from_str(r#"{"id": "1", "volume": null}"#).unwrap();
        assert!(market.volume.is_none());
        assert!(market.active.is_none());
    }

    #[test]
    fn test_search_response_flattens_in_event_order() {
        let json = r#"{
            "events": [
                {"id": "e1", "title": "First", "markets": [{"id": "m1"}, {"id": "m2"}]},
                {"id": "e2", "title": "Empty"},
                {"id": "e3", "markets": [{"id": "m3"}]}
            ],
            "tags": []
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = response.into_markets().map(|m| m.id).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
    }
}
