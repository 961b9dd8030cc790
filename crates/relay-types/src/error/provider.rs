//! Provider-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while calling the generation provider.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProviderError {
    /// Connection, TLS, or timeout failure before a response arrived
    #[error("Provider request failed: {message}")]
    Network { message: String },

    /// Non-2xx response. `message` is already sanitized for clients.
    #[error("Provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Could not decode provider response: {message}")]
    Decode { message: String },

    /// Response carried no text (blocked prompt, empty candidate, etc)
    #[error("Provider returned no text ({reason})")]
    EmptyResponse { reason: String },
}

impl ProviderError {
    /// Rate limits and 5xx are transient; the caller may resubmit.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } | Self::EmptyResponse { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        assert!(ProviderError::Upstream { status: 503, message: String::new() }.is_transient());
        assert!(ProviderError::Upstream { status: 429, message: String::new() }.is_transient());
        assert!(!ProviderError::Upstream { status: 400, message: String::new() }.is_transient());
        assert!(!ProviderError::EmptyResponse { reason: "SAFETY".into() }.is_transient());
    }
}
