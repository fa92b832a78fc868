//! Server configuration from the environment.
//!
//! The environment contract is the agent-facing one: `API_BASE_URL`,
//! `API_USERNAME`, and `API_PASSWORD` select the upstream account, with
//! `PYTHIA_TIMEOUT_SECS` tuning the request timeout. Lookups are injected as
//! a closure so tests never touch the process environment.

use std::time::Duration;

use thiserror::Error;

use pythia_common::{ClientConfig, Credentials, CredentialsError};

/// Environment variable naming the upstream base URL.
pub const ENV_BASE_URL: &str = "API_BASE_URL";
/// Environment variable naming the upstream account.
pub const ENV_USERNAME: &str = "API_USERNAME";
/// Environment variable holding the upstream password.
pub const ENV_PASSWORD: &str = "API_PASSWORD";
/// Environment variable overriding the request timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "PYTHIA_TIMEOUT_SECS";

/// Base URL used when [`ENV_BASE_URL`] is unset.
pub const DEFAULT_BASE_URL: &str = "https://aiprediction.us";

/// Errors raised while assembling a [`ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    /// A variable is present but unusable.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        /// The offending variable.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The assembled credentials were rejected.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
}

/// Everything the server needs to start: who to log in as, and how patient
/// to be with the upstream service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Upstream account and base URL.
    pub credentials: Credentials,
    /// HTTP client tuning.
    pub client: ClientConfig,
}

impl ServerConfig {
    /// Build a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when the username or password is
    /// absent or blank, [`ConfigError::InvalidVar`] when the timeout does
    /// not parse to a positive number of seconds, and
    /// [`ConfigError::Credentials`] when the base URL is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = var(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let username = var(ENV_USERNAME).ok_or(ConfigError::MissingVar(ENV_USERNAME))?;
        // Passwords keep their inner whitespace; only blank counts as unset.
        let password = lookup(ENV_PASSWORD)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_PASSWORD))?;

        let credentials = Credentials::new(base_url, username, password)?;

        let mut client = ClientConfig::default();
        if let Some(raw) = var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: ENV_TIMEOUT_SECS,
                reason: format!("expected a whole number of seconds, got {raw:?}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidVar {
                    name: ENV_TIMEOUT_SECS,
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            client = client.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            credentials,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_USERNAME, "oracle"),
            (ENV_PASSWORD, "delphic"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.credentials.username(), "oracle");
        assert_eq!(config.client, ClientConfig::default());
    }

    #[test]
    fn full_environment_overrides_base_url_and_timeout() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://staging.example.com/"),
            (ENV_USERNAME, "oracle"),
            (ENV_PASSWORD, "delphic"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.base_url(), "https://staging.example.com");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        assert_eq!(config.client.token_ttl, ClientConfig::default().token_ttl);
    }

    #[test]
    fn missing_password_is_reported_by_name() {
        let err = ServerConfig::from_lookup(lookup(&[(ENV_USERNAME, "oracle")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(name) if name == ENV_PASSWORD));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let err = ServerConfig::from_lookup(lookup(&[
            (ENV_USERNAME, "oracle"),
            (ENV_PASSWORD, "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(name) if name == ENV_PASSWORD));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            (ENV_USERNAME, "oracle"),
            (ENV_PASSWORD, "delphic"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name, .. } if name == ENV_TIMEOUT_SECS));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            (ENV_USERNAME, "oracle"),
            (ENV_PASSWORD, "delphic"),
            (ENV_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::InvalidVar { name, reason } => {
                assert_eq!(name, ENV_TIMEOUT_SECS);
                assert!(reason.contains("at least one second"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
