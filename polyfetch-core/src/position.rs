//! Ledger position structures

use serde::{Deserialize, Serialize};

/// One bettor's stake on one outcome of a market, as recorded on the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPosition {
    /// Position identifier
    pub id: String,

    /// Bettor (wallet) identifier
    pub user: String,

    /// Outcome label as the ledger records it (an outcome index, e.g. "0")
    pub outcome: String,

    /// Market (condition) identifier
    pub market: String,

    #[serde(default)]
    pub quantity_bought: String,

    #[serde(default)]
    pub quantity_sold: String,
}
