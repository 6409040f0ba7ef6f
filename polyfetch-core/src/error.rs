//! Error types for Polyfetch

use crate::platform::Upstream;
use thiserror::Error;

/// Polyfetch-wide error type
///
/// Field-level parse failures are deliberately absent here: those degrade a
/// single value (see [`crate::parse::Parsed`]) and never abort a request.
#[derive(Error, Debug)]
pub enum PolyfetchError {
    /// The upstream could not be reached (connection failure, timeout)
    #[error("{upstream} transport error: {message}")]
    Transport { upstream: Upstream, message: String },

    /// The upstream answered with a non-success status or a malformed body
    #[error("{upstream} protocol error: {message}")]
    Protocol { upstream: Upstream, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PolyfetchError {
    pub fn transport(upstream: Upstream, message: impl Into<String>) -> Self {
        PolyfetchError::Transport {
            upstream,
            message: message.into(),
        }
    }

    pub fn protocol(upstream: Upstream, message: impl Into<String>) -> Self {
        PolyfetchError::Protocol {
            upstream,
            message: message.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        PolyfetchError::NotFound(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        PolyfetchError::InvalidRequest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PolyfetchError::Config(msg.into())
    }

    /// The upstream this error originated from, if any
    pub fn upstream(&self) -> Option<Upstream> {
        match self {
            PolyfetchError::Transport { upstream, .. } | PolyfetchError::Protocol { upstream, .. } => {
                Some(*upstream)
            }
            _ => None,
        }
    }
}

/// Result type alias for Polyfetch operations
pub type PolyfetchResult<T> = Result<T, PolyfetchError>;
