//! Error types for the client library.

use pythia_common::{CredentialsError, DateError};
use thiserror::Error;

/// Longest slice of a response body carried into errors and logs.
pub(crate) const BODY_SNIPPET_MAX: usize = 256;

/// Clip a response body for diagnostics.
///
/// Bodies short enough are passed through trimmed; longer ones are cut at the
/// nearest character boundary at or below the limit.
pub(crate) fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_SNIPPET_MAX {
        return trimmed.to_string();
    }
    let mut end = BODY_SNIPPET_MAX;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

/// Errors that can occur while querying the prediction service.
///
/// Every variant maps to a stable kind name via [`ClientError::kind`], which
/// the MCP layer uses to render structured error payloads for the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The caller's date input could not be turned into a date code.
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] DateError),

    /// The credential exchange failed, or a request was rejected as
    /// unauthorized twice in a row.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The service has no record for the requested day. A normal outcome for
    /// weekends and holidays, not a fault.
    #[error("No data available for date {0}")]
    NoDataForDate(String),

    /// Network or HTTP request failure.
    ///
    /// Covers DNS resolution, connection failures, socket errors, and
    /// timeouts. These errors are typically retryable.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status the client has no mapping for.
    #[error("Service error (status {status}): {body}")]
    Service {
        /// The HTTP status the service answered with.
        status: u16,
        /// A clipped slice of the response body.
        body: String,
    },

    /// A success response whose body did not have the promised shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Credentials or client settings were unusable.
    #[error("Configuration error: {0}")]
    Configuration(#[from] CredentialsError),
}

impl ClientError {
    /// Stable machine-readable name for this error's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDate(_) => "invalid_date",
            Self::Authentication(_) => "authentication",
            Self::NoDataForDate(_) => "no_data_for_date",
            Self::Transport(_) => "transport",
            Self::Service { .. } => "service",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Check if retrying the same call later could plausibly succeed.
    ///
    /// Returns `true` for transport faults and server-side errors; input,
    /// authentication, and configuration problems will not fix themselves.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Service { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
