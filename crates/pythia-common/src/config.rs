//! Tuning knobs for the API client.

use std::time::Duration;

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

// Upstream tokens live roughly a day; staying an hour inside that keeps a
// cached token from expiring mid-request.
const fn default_token_ttl() -> Duration {
    Duration::from_secs(23 * 60 * 60)
}

/// Client behavior that is configurable but not per-request.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use pythia_common::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_token_ttl(Duration::from_secs(60 * 60));
/// assert_eq!(config.timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bound on each HTTP request, connection setup included.
    pub timeout: Duration,

    /// How long a cached session token is trusted before re-authenticating.
    pub token_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            token_ttl: default_token_ttl(),
        }
    }
}

impl ClientConfig {
    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the cached-token lifetime.
    ///
    /// A zero TTL disables caching entirely; every request re-authenticates.
    #[must_use]
    pub const fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}
