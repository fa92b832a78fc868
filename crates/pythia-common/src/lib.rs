//! # pythia-common
//!
//! Common types for the Pythia prediction-API bridge.
//!
//! This crate provides the foundational types shared by the client and the
//! MCP server:
//! - Validated, immutable service credentials
//! - Client configuration (request timeout, token TTL estimate)
//! - The YYMMDD date codec used to key the service's daily records
//! - Wire-shaped records returned by the service
//!
//! ## Example
//!
//! ```
//! use pythia_common::{ClientConfig, Credentials, DateCode};
//!
//! let credentials = Credentials::new("https://aiprediction.us", "user", "secret")?;
//! assert_eq!(credentials.base_url(), "https://aiprediction.us");
//!
//! let config = ClientConfig::default()
//!     .with_timeout(std::time::Duration::from_secs(10));
//!
//! // Encode a calendar date as the service's 6-digit day key
//! let code = DateCode::from_ymd(2025, 3, 15)?;
//! assert_eq!(code.as_str(), "250315");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Client configuration: request timeout and token TTL estimate.
pub mod config;
/// Immutable, validated service credentials.
pub mod credentials;
/// Conversion between calendar dates and the service's YYMMDD date codes.
pub mod date;
/// Wire-shaped payloads returned by the remote service.
pub mod record;

pub use config::ClientConfig;
pub use credentials::{Credentials, CredentialsError};
pub use date::{DateCode, DateError};
pub use record::{DebugSnapshot, PredictionRecord};
