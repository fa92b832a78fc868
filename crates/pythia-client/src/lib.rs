//! # pythia-client
//!
//! Authenticated client for the aiprediction.us daily prediction API.
//!
//! The crate owns the whole session lifecycle so callers never see a token:
//! - Credential exchange against `/api-token-auth/`, with the result cached
//!   under a conservative TTL and concurrent logins coalesced
//! - Authorized queries for daily prediction records and the service's
//!   debug report, with one automatic refresh-and-retry when a cached token
//!   is rejected
//! - A typed error taxonomy ([`ClientError`]) that the MCP layer renders
//!   into structured payloads
//!
//! ## Example
//!
//! ```no_run
//! use pythia_client::{Oracle, PredictionService};
//! use pythia_common::{ClientConfig, Credentials};
//!
//! # async fn example() -> Result<(), pythia_client::ClientError> {
//! let credentials = Credentials::new("https://aiprediction.us", "user", "secret")?;
//! let oracle = Oracle::new(credentials, ClientConfig::default())?;
//!
//! // First call logs in, later calls reuse the session
//! let record = oracle.data_for_date("March 15, 2025").await?;
//! println!("predictions: {:?}", record.last_elements);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use pythia_common::{DateCode, DebugSnapshot, PredictionRecord};

pub mod api;
pub mod error;
pub mod oracle;
pub mod token;

pub use api::ApiClient;
pub use error::{ClientError, Result};
pub use oracle::Oracle;
pub use token::TokenStore;

/// The queries the prediction service answers.
///
/// [`Oracle`] is the production implementation; the trait exists so servers
/// and tests can consume the operations behind a shared `Arc` without caring
/// how records are fetched.
#[must_use = "a PredictionService does nothing until queried"]
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Fetch today's prediction record, keyed by the local calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoDataForDate`] when no record exists for
    /// today, or any of the authentication, transport, and service errors a
    /// query can produce.
    async fn current_date_data(&self) -> Result<PredictionRecord>;

    /// Fetch the record for a caller-supplied day.
    ///
    /// Accepts a ready-made YYMMDD code or a natural date string; see
    /// [`DateCode::resolve`] for the accepted forms.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidDate`] when the input cannot be turned
    /// into a date code, without touching the network; otherwise the same
    /// errors as [`Self::current_date_data`].
    async fn data_for_date(&self, input: &str) -> Result<PredictionRecord>;

    /// Turn caller-supplied text into the service's YYMMDD day key.
    ///
    /// Purely local; never touches the network.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidDate`] when the input is neither a code
    /// nor a recognized date string.
    fn format_date(&self, input: &str) -> Result<DateCode>;

    /// Fetch the service's debug report with observed status and latency.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Service`] for any non-success status, plus the
    /// usual authentication and transport errors.
    async fn debug_info(&self) -> Result<DebugSnapshot>;
}
