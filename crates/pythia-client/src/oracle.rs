//! The ready-to-use prediction-service client.

use std::sync::Arc;

use async_trait::async_trait;

use pythia_common::{ClientConfig, Credentials, DateCode, DebugSnapshot, PredictionRecord};

use crate::PredictionService;
use crate::api::ApiClient;
use crate::error::Result;
use crate::token::TokenStore;

/// Session handling plus queries, wired together and ready to share.
///
/// Construction builds one bounded-timeout HTTP client that both the
/// credential exchange and the data requests reuse. The instance is cheap
/// to park behind an `Arc` and safe to call concurrently.
#[derive(Debug)]
pub struct Oracle {
    api: ApiClient,
}

impl Oracle {
    /// Build a client for the given account.
    ///
    /// No network traffic happens here; the first query triggers the login.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let base_url = credentials.base_url().to_string();
        let tokens = Arc::new(TokenStore::new(http.clone(), credentials, config.token_ttl));
        Ok(Self {
            api: ApiClient::new(http, base_url, tokens),
        })
    }
}

#[async_trait]
impl PredictionService for Oracle {
    async fn current_date_data(&self) -> Result<PredictionRecord> {
        self.api.fetch_last_elements(&DateCode::today()).await
    }

    async fn data_for_date(&self, input: &str) -> Result<PredictionRecord> {
        let code = DateCode::resolve(input)?;
        self.api.fetch_last_elements(&code).await
    }

    fn format_date(&self, input: &str) -> Result<DateCode> {
        Ok(DateCode::resolve(input)?)
    }

    async fn debug_info(&self) -> Result<DebugSnapshot> {
        self.api.fetch_debug_info().await
    }
}
