//! GraphQL request/response envelope

use polyfetch_core::{PolyfetchError, Upstream};
use serde::{Deserialize, Serialize};

/// A GraphQL query request
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub variables: serde_json::Value,
}

/// A single error reported by the GraphQL server
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// A GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap the payload
    ///
    /// Any reported error fails the whole call, even if partial data came
    /// back alongside it.
    pub fn into_data(self) -> Result<T, PolyfetchError> {
        if let Some(first) = self.errors.first() {
            return Err(PolyfetchError::protocol(
                Upstream::Ledger,
                format!("GraphQL error: {}", first.message),
            ));
        }

        self.data.ok_or_else(|| {
            PolyfetchError::protocol(Upstream::Ledger, "GraphQL response carried no data")
        })
    }
}
