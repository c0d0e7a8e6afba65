//! Catalog API error types.

use thiserror::Error;

use crate::domain::entities::GameId;

/// Catalog API error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CatalogError {
    #[error("game {id} not found")]
    GameNotFound { id: GameId },

    #[error("catalog request failed: {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("failed to decode catalog response: {message}")]
    Decode { message: String },

    #[error("invalid catalog configuration: {message}")]
    Configuration { message: String },
}

impl CatalogError {
    /// Creates request failure error.
    #[must_use]
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: None,
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
