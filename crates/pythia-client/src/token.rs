//! Session-token acquisition and caching.
//!
//! The service hands out day-scale session tokens in exchange for account
//! credentials. One login per process is the goal: the first caller that
//! needs a token performs the credential exchange while holding the cache
//! lock, so callers that arrive mid-login queue up and reuse the fresh
//! result instead of racing into duplicate logins.

use std::time::{Duration, Instant};

use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

use pythia_common::Credentials;

use crate::error::{ClientError, Result, body_snippet};

/// Path of the credential-exchange endpoint, relative to the base URL.
const AUTH_PATH: &str = "/api-token-auth/";

/// What the login endpoint answers with.
///
/// Only `token` matters to the client; the rest is session metadata the
/// service includes and we surface at debug level.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    is_member: Option<bool>,
    #[serde(default)]
    expires_at: Option<String>,
}

#[derive(Debug)]
struct CachedToken {
    value: SecretString,
    obtained_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.obtained_at.elapsed() < ttl
    }
}

/// Caches one session token per store and refreshes it on demand.
///
/// The TTL is a conservative local estimate, not the server's word: the
/// server does not advertise expiry in a machine-readable way, so the store
/// assumes staleness early and re-authenticates rather than risk sending a
/// dead token.
#[derive(Debug)]
pub struct TokenStore {
    http: reqwest::Client,
    credentials: Credentials,
    token_ttl: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenStore {
    /// Create a store around an HTTP client and validated credentials.
    #[must_use]
    pub fn new(http: reqwest::Client, credentials: Credentials, token_ttl: Duration) -> Self {
        Self {
            http,
            credentials,
            token_ttl,
            cached: Mutex::new(None),
        }
    }

    /// Return a token younger than the configured TTL, logging in if needed.
    ///
    /// The cache lock is held across the credential exchange on purpose:
    /// concurrent callers block until the in-flight login finishes and then
    /// find the fresh token waiting, so a burst of requests produces exactly
    /// one login.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] if the service rejects the
    /// credentials or answers with an unusable body, and
    /// [`ClientError::Transport`] if the exchange never completes.
    pub async fn get_valid_token(&self) -> Result<SecretString> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(self.token_ttl) {
                return Ok(token.value.clone());
            }
            debug!("cached session token is past its TTL, re-authenticating");
        }

        let value = self.authenticate().await?;
        *cached = Some(CachedToken {
            value: value.clone(),
            obtained_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached token so the next caller performs a fresh login.
    ///
    /// Called when the service rejects a request as unauthorized before its
    /// local TTL ran out.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn authenticate(&self) -> Result<SecretString> {
        let url = format!("{}{AUTH_PATH}", self.credentials.base_url());
        debug!(
            "requesting session token for {} from {url}",
            self.credentials.username()
        );

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "username": self.credentials.username(),
                "password": self.credentials.password().expose_secret(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("credential exchange rejected with status {status}");
            return Err(ClientError::Authentication(format!(
                "login rejected with status {}: {}",
                status.as_u16(),
                body_snippet(&body)
            )));
        }

        let body = response.text().await?;
        let parsed: AuthResponse = serde_json::from_str(&body).map_err(|e| {
            ClientError::Authentication(format!(
                "login response was not understood: {e}; body: {}",
                body_snippet(&body)
            ))
        })?;
        if parsed.token.is_empty() {
            return Err(ClientError::Authentication(
                "login response carried an empty token".to_string(),
            ));
        }

        debug!(
            "session established: user_id={:?} username={:?} is_member={:?} expires_at={:?}",
            parsed.user_id, parsed.username, parsed.is_member, parsed.expires_at
        );

        Ok(SecretString::new(parsed.token.into()))
    }
}
