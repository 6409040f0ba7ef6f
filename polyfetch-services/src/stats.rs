//! Market statistics derivation
//!
//! Stats are computed fresh on every request. The ledger is preferred: it
//! yields real bettor counts. When it is unavailable, fails, or has nothing
//! usable for the market, outcome prices are read as probabilities instead.

use polyfetch_core::parse::parse_decimal;
use polyfetch_core::{DerivedStats, LedgerPosition, Market, MarketStats, OutcomeStat, PositionLedger, StatsSource};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Distinct bettors per outcome label, plus across the whole market
#[derive(Debug, Default)]
pub struct OutcomeAggregate<'a> {
    by_outcome: HashMap<&'a str, HashSet<&'a str>>,
    users: HashSet<&'a str>,
}

impl<'a> OutcomeAggregate<'a> {
    pub fn from_positions(positions: &'a [LedgerPosition]) -> Self {
        let mut aggregate = Self::default();
        for position in positions {
            aggregate
                .by_outcome
                .entry(position.outcome.as_str())
                .or_default()
                .insert(position.user.as_str());
            aggregate.users.insert(position.user.as_str());
        }
        aggregate
    }

    pub fn total_users(&self) -> u64 {
        self.users.len() as u64
    }

    /// Distinct bettors on an outcome label, `None` if no position names it
    pub fn users_for(&self, outcome: &str) -> Option<u64> {
        self.by_outcome.get(outcome).map(|users| users.len() as u64)
    }
}

/// Computes [`DerivedStats`] for markets
#[derive(Clone)]
pub struct StatsEngine {
    ledger: Option<Arc<dyn PositionLedger>>,
}

impl StatsEngine {
    /// Engine that consults the ledger before falling back to prices
    pub fn new(ledger: Arc<dyn PositionLedger>) -> Self {
        Self { ledger: Some(ledger) }
    }

    /// Engine that only ever derives stats from prices
    pub fn price_only() -> Self {
        Self { ledger: None }
    }

    pub fn has_ledger(&self) -> bool {
        self.ledger.is_some()
    }

    /// Derive stats for a market. Never fails.
    #[instrument(skip(self, market), fields(market_id = %market.id))]
    pub async fn compute_stats(&self, market: &Market) -> DerivedStats {
        if let Some(ledger) = &self.ledger {
            if market.condition_id.is_empty() {
                debug!("Market has no condition ID, skipping ledger");
            } else {
                match ledger.fetch_positions(&market.condition_id).await {
                    Ok(positions) => match derive_from_ledger(market, &positions) {
                        Some(stats) => return DerivedStats::LedgerDerived(stats),
                        None => debug!(
                            positions = positions.len(),
                            "Ledger has no usable positions, using prices"
                        ),
                    },
                    Err(e) => warn!("Ledger lookup failed, using prices: {}", e),
                }
            }
        }

        DerivedStats::PriceDerived(derive_from_prices(market))
    }
}

impl std::fmt::Debug for StatsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsEngine")
            .field("ledger", &self.has_ledger())
            .finish()
    }
}

/// Bettor distribution from ledger positions
///
/// Positions are keyed by outcome index rendered as a string (`"0"`, `"1"`).
/// Returns `None` when there are no bettors at all, or when none of the
/// market's outcome indices appears on the ledger.
pub fn derive_from_ledger(market: &Market, positions: &[LedgerPosition]) -> Option<MarketStats> {
    let aggregate = OutcomeAggregate::from_positions(positions);
    let total = aggregate.total_users();
    if total == 0 {
        return None;
    }

    let mut matched = false;
    let mut outcome_stats = Vec::with_capacity(market.outcomes.len());

    for (index, outcome) in market.outcomes.iter().enumerate() {
        let user_count = match aggregate.users_for(&index.to_string()) {
            Some(count) => {
                matched = true;
                count
            }
            None => 0,
        };

        outcome_stats.push(OutcomeStat {
            outcome: outcome.clone(),
            outcome_index: index,
            user_count,
            percentage: 100.0 * user_count as f64 / total as f64,
            price: market.price_at(index).to_string(),
        });
    }

    if !matched {
        return None;
    }

    Some(build_stats(market, total, outcome_stats, StatsSource::Ledger))
}

/// Implied probabilities from outcome prices
pub fn derive_from_prices(market: &Market) -> MarketStats {
    let outcome_stats = market
        .outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let price = market.price_at(index);
            let probability = parse_decimal(price).log_degraded("outcomePrices", &market.id);

            OutcomeStat {
                outcome: outcome.clone(),
                outcome_index: index,
                user_count: 0,
                percentage: price_to_percentage(probability),
                price: price.to_string(),
            }
        })
        .collect();

    build_stats(market, 0, outcome_stats, StatsSource::Prices)
}

/// Scale a probability in [0, 1] to a percentage, in decimal arithmetic
fn price_to_percentage(price: Decimal) -> f64 {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

/// Pick the outcome with the highest percentage
///
/// The first outcome wins ties. When nothing is above zero there is no
/// popular outcome and the percentage is 0.
pub fn select_popular(outcome_stats: &[OutcomeStat]) -> (Option<String>, f64) {
    let mut popular = None;
    let mut max = 0.0;

    for stat in outcome_stats {
        if stat.percentage > max {
            max = stat.percentage;
            popular = Some(stat.outcome.clone());
        }
    }

    (popular, max)
}

fn build_stats(
    market: &Market,
    total_users: u64,
    outcome_stats: Vec<OutcomeStat>,
    source: StatsSource,
) -> MarketStats {
    let (popular_outcome, popular_percentage) = select_popular(&outcome_stats);

    MarketStats {
        market_id: market.id.clone(),
        question: market.question.clone(),
        total_users,
        outcome_stats,
        popular_outcome,
        popular_percentage,
        source,
    }
}
