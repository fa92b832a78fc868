//! Authorized requests against the prediction endpoints.
//!
//! The client sends the session token in a `Token` authorization scheme, as
//! the service expects. A request rejected as unauthorized gets exactly one
//! second chance: the cached token is dropped, a fresh login runs, and the
//! request is reissued. Every other failure is classified and surfaced
//! without retrying, leaving retry policy to the caller.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, warn};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use pythia_common::{DateCode, DebugSnapshot, PredictionRecord};

use crate::error::{ClientError, Result, body_snippet};
use crate::token::TokenStore;

/// HTTP-level client for the prediction endpoints.
///
/// Holds no per-request state; one instance serves all calls for the life of
/// the process.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    /// Create a client from a shared HTTP client, validated base URL, and
    /// token store.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Fetch the prediction record keyed by a date code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoDataForDate`] when the service has no record
    /// for the day, [`ClientError::Authentication`] when a refreshed token is
    /// rejected too, [`ClientError::MalformedResponse`] when a success body
    /// does not parse as a record, and [`ClientError::Transport`] or
    /// [`ClientError::Service`] for network and server faults.
    pub async fn fetch_last_elements(&self, date_code: &DateCode) -> Result<PredictionRecord> {
        let url = format!("{}/api/v53a/{date_code}/last-elements/", self.base_url);
        let (status, body) = self.get_authorized(&url).await?;

        if status.is_success() {
            return parse_json(&body);
        }
        if status == StatusCode::NOT_FOUND {
            debug!("no record exists for date {date_code}");
            return Err(ClientError::NoDataForDate(date_code.to_string()));
        }
        Err(service_error(status, &body))
    }

    /// Fetch the service's debug report, recording status and latency.
    ///
    /// A 404 here is a fault, not a missing day: the endpoint is not keyed
    /// by date and should always exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Service`] for any non-success status,
    /// [`ClientError::MalformedResponse`] when the body is not JSON, and the
    /// usual authentication and transport errors.
    pub async fn fetch_debug_info(&self) -> Result<DebugSnapshot> {
        let url = format!("{}/api/debug/v53a/general/", self.base_url);
        let started = Instant::now();
        let (status, body) = self.get_authorized(&url).await?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if !status.is_success() {
            return Err(service_error(status, &body));
        }
        let payload = parse_json(&body)?;
        debug!("debug report fetched in {latency_ms}ms");
        Ok(DebugSnapshot {
            payload,
            status: status.as_u16(),
            latency_ms,
        })
    }

    /// Issue an authorized GET, refreshing the session token at most once.
    async fn get_authorized(&self, url: &str) -> Result<(StatusCode, String)> {
        let token = self.tokens.get_valid_token().await?;
        let response = self.send_with_token(url, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            let status = response.status();
            return Ok((status, response.text().await?));
        }

        warn!("request rejected as unauthorized, dropping cached token and retrying once");
        self.tokens.invalidate().await;
        let token = self.tokens.get_valid_token().await?;
        let retry = self.send_with_token(url, &token).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            let body = retry.text().await.unwrap_or_default();
            error!("request still unauthorized after a fresh login");
            return Err(ClientError::Authentication(format!(
                "request rejected twice, second time with a fresh token: {}",
                body_snippet(&body)
            )));
        }
        let status = retry.status();
        Ok((status, retry.text().await?))
    }

    async fn send_with_token(&self, url: &str, token: &SecretString) -> Result<reqwest::Response> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", token.expose_secret()))
            .send()
            .await?;
        Ok(response)
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        warn!("response body did not parse: {e}; body: {}", body_snippet(body));
        ClientError::MalformedResponse(format!("{e}; body: {}", body_snippet(body)))
    })
}

fn service_error(status: StatusCode, body: &str) -> ClientError {
    error!("service answered with unexpected status {status}");
    ClientError::Service {
        status: status.as_u16(),
        body: body_snippet(body),
    }
}
