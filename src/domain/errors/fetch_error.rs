//! Image fetch error types.

use thiserror::Error;

/// Failure of a single artwork fetch.
///
/// `Clone` so one coalesced network result can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("invalid image URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("image request to {url} failed: {message}")]
    RequestFailed {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("response from {url} is not a valid image: {message}")]
    InvalidImage { url: String, message: String },

    #[error("image fetch for {url} was cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    /// Creates invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a transport-level request failure.
    #[must_use]
    pub fn request_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Creates a request failure for a non-200 response.
    #[must_use]
    pub fn bad_status(url: impl Into<String>, status: u16, reason: Option<&str>) -> Self {
        Self::RequestFailed {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP {status}: {}", reason.unwrap_or("Unknown")),
        }
    }

    /// Creates decode failure error.
    #[must_use]
    pub fn invalid_image(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidImage {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates cancellation outcome.
    #[must_use]
    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::Cancelled { url: url.into() }
    }

    /// Returns whether a caller may reasonably retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Returns whether the fetch was abandoned rather than failed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}
