//! Market data structures

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long past its end date a market is still listed
///
/// Markets that are resolving but not yet administratively closed stay
/// visible for this long.
pub const EXPIRY_GRACE_HOURS: i64 = 24;

/// A prediction market in canonical form
///
/// `outcomes` and `outcome_prices` are index-aligned when both are present.
/// Their lengths may differ when upstream omits (or garbles) one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Catalog identifier
    pub id: String,

    /// Condition identifier, used as the market key on the ledger
    pub condition_id: String,

    pub question: String,

    pub description: String,

    /// Outcome names in upstream order (e.g., "Yes", "No")
    pub outcomes: Vec<String>,

    /// Outcome prices as decimal strings in [0, 1], aligned with `outcomes`
    pub outcome_prices: Vec<String>,

    /// When the market ends, if upstream provided a parseable date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    /// Traded volume as a decimal string
    pub volume: String,

    /// Available liquidity as a decimal string
    pub liquidity: String,

    /// Upstream active AND NOT upstream closed
    pub active: bool,
}

impl Market {
    /// Price string for an outcome index, `"0"` when prices run short
    pub fn price_at(&self, index: usize) -> &str {
        self.outcome_prices
            .get(index)
            .map(String::as_str)
            .unwrap_or("0")
    }

    /// Whether the market ended more than [`EXPIRY_GRACE_HOURS`] before `now`
    ///
    /// A market without an end date has no expiry information and is never
    /// considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.end_date {
            Some(end) => end < now - Duration::hours(EXPIRY_GRACE_HOURS),
            None => false,
        }
    }
}

/// Where a set of statistics came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    /// Distinct bettors per outcome from the position ledger
    Ledger,
    /// Outcome prices read as probabilities
    Prices,
}

/// Statistics for a single outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeStat {
    pub outcome: String,

    pub outcome_index: usize,

    /// Distinct bettors on this outcome (0 when unknown)
    pub user_count: u64,

    /// Share of the market, 0-100
    pub percentage: f64,

    /// Raw price string for this outcome
    pub price: String,
}

/// Betting distribution for a market, computed fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub market_id: String,

    /// Question snapshot taken when the stats were computed
    pub question: String,

    /// Distinct bettors across all outcomes (0 when unknown, see `source`)
    pub total_users: u64,

    /// One entry per outcome, in the market's outcome order
    pub outcome_stats: Vec<OutcomeStat>,

    /// Outcome with the highest percentage; first wins ties, unset when all are zero
    pub popular_outcome: Option<String>,

    #[serde(rename = "popularPct")]
    pub popular_percentage: f64,

    pub source: StatsSource,
}

/// Stats tagged with how they were derived
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedStats {
    LedgerDerived(MarketStats),
    PriceDerived(MarketStats),
}

impl DerivedStats {
    pub fn source(&self) -> StatsSource {
        match self {
            DerivedStats::LedgerDerived(_) => StatsSource::Ledger,
            DerivedStats::PriceDerived(_) => StatsSource::Prices,
        }
    }

    pub fn stats(&self) -> &MarketStats {
        match self {
            DerivedStats::LedgerDerived(stats) | DerivedStats::PriceDerived(stats) => stats,
        }
    }

    pub fn into_stats(self) -> MarketStats {
        match self {
            DerivedStats::LedgerDerived(stats) | DerivedStats::PriceDerived(stats) => stats,
        }
    }

    /// Total distinct bettors, or `None` when the count is unknown
    ///
    /// Price-derived stats report a total of 0 on the wire; this is where
    /// "unknown" and "zero" are told apart.
    pub fn known_total_users(&self) -> Option<u64> {
        match self {
            DerivedStats::LedgerDerived(stats) => Some(stats.total_users),
            DerivedStats::PriceDerived(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn market(end_date: Option<DateTime<Utc>>) -> Market {
        Market {
            id: "12".to_string(),
            condition_id: "0xabc".to_string(),
            question: "Will it rain?".to_string(),
            description: String::new(),
            outcomes: vec!["Yes".to_string(), "No".to_string()],
            outcome_prices: vec!["0.4".to_string()],
            end_date,
            volume: "1500.25".to_string(),
            liquidity: "".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_price_at_pads_with_zero() {
        let m = market(None);
        assert_eq!(m.price_at(0), "0.4");
        assert_eq!(m.price_at(1), "0");
    }

    #[test]
    fn test_expiry_grace_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

        // Ended 23 hours ago: still inside the grace window
        assert!(!market(Some(now - Duration::hours(23))).is_expired_at(now));
        // Exactly 24 hours ago: not *more* than 24 hours
        assert!(!market(Some(now - Duration::hours(24))).is_expired_at(now));
        assert!(market(Some(now - Duration::hours(25))).is_expired_at(now));
        assert!(!market(Some(now + Duration::days(3))).is_expired_at(now));
        assert!(!market(None).is_expired_at(now));
    }

    #[test]
    fn test_market_serializes_camel_case_without_missing_end_date() {
        let json = serde_json::to_value(market(None)).unwrap();
        assert_eq!(json["conditionId"], "0xabc");
        assert_eq!(json["outcomePrices"], serde_json::json!(["0.4"]));
        assert!(json.get("endDate").is_none());
    }

    #[test]
    fn test_known_total_users_distinguishes_unknown() {
        let stats = MarketStats {
            market_id: "12".to_string(),
            question: "Will it rain?".to_string(),
            total_users: 0,
            outcome_stats: Vec::new(),
            popular_outcome: None,
            popular_percentage: 0.0,
            source: StatsSource::Prices,
        };

        let price = DerivedStats::PriceDerived(stats.clone());
        assert_eq!(price.known_total_users(), None);
        assert_eq!(price.source(), StatsSource::Prices);

        let ledger = DerivedStats::LedgerDerived(MarketStats {
            total_users: 3,
            source: StatsSource::Ledger,
            ..stats
        });
        assert_eq!(ledger.known_total_users(), Some(3));
        assert_eq!(ledger.stats().total_users, 3);
    }
}
