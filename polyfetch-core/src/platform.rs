//! Upstream data sources

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two upstream services Polyfetch reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Upstream {
    /// REST market catalog (Polymarket Gamma API)
    Catalog,
    /// GraphQL position ledger (Polymarket subgraph)
    Ledger,
}

impl Upstream {
    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Upstream::Catalog => "Catalog",
            Upstream::Ledger => "Ledger",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
