//! Position queries and pagination

use async_trait::async_trait;
use polyfetch_core::{LedgerPosition, PolyfetchResult};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// Records requested per page
pub const PAGE_SIZE: usize = 1000;

/// Largest skip offset ever requested
///
/// The hosted subgraph rejects larger offsets, so markets with more than
/// `MAX_SKIP + PAGE_SIZE` positions are truncated.
pub const MAX_SKIP: usize = 10_000;

pub(crate) const POSITIONS_QUERY: &str = r#"
query MarketPositions($marketId: String!, $first: Int!, $skip: Int!) {
  positions(where: { market: $marketId }, first: $first, skip: $skip) {
    id
    user { id }
    outcome
    market { id }
    quantityBought
    quantitySold
  }
}
"#;

/// Accept a scalar sent either as a string or a number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::String(s)) => s,
        Some(Scalar::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntityRef {
    pub id: String,
}

/// A position entity as the subgraph returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PositionEntity {
    pub id: String,
    pub user: EntityRef,
    #[serde(deserialize_with = "string_or_number")]
    pub outcome: String,
    pub market: EntityRef,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity_bought: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity_sold: String,
}

impl From<PositionEntity> for LedgerPosition {
    fn from(entity: PositionEntity) -> Self {
        LedgerPosition {
            id: entity.id,
            user: entity.user.id,
            outcome: entity.outcome,
            market: entity.market.id,
            quantity_bought: entity.quantity_bought,
            quantity_sold: entity.quantity_sold,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PositionsData {
    #[serde(default)]
    pub positions: Vec<PositionEntity>,
}

/// Something that can serve one page of positions for a market
#[async_trait]
pub trait PositionPageSource: Send + Sync {
    async fn fetch_page(
        &self,
        market_id: &str,
        first: usize,
        skip: usize,
    ) -> PolyfetchResult<Vec<LedgerPosition>>;
}

/// Fetch every position for a market, page by page
///
/// Stops on the first short page, or once the next skip would pass
/// [`MAX_SKIP`]. A failed page fails the whole call.
pub async fn fetch_all_positions<S>(source: &S, market_id: &str) -> PolyfetchResult<Vec<LedgerPosition>>
where
    S: PositionPageSource + ?Sized,
{
    let mut positions = Vec::new();
    let mut skip = 0;

    loop {
        let page = source.fetch_page(market_id, PAGE_SIZE, skip).await?;
        let received = page.len();
        positions.extend(page);

        if received < PAGE_SIZE {
            break;
        }

        skip += PAGE_SIZE;
        if skip > MAX_SKIP {
            warn!(
                market_id,
                fetched = positions.len(),
                "Position pagination ceiling reached, result truncated"
            );
            break;
        }
    }

    debug!("Fetched {} positions for market {}", positions.len(), market_id);
    Ok(positions)
}
