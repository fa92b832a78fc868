//! Account credentials for the prediction service.
//!
//! The password is held as a [`SecretString`] so it never appears in `Debug`
//! output or logs; call sites that build the login request reach it through
//! [`secrecy::ExposeSecret`].

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Errors produced while validating credentials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    /// A required field was empty or whitespace.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The base URL did not parse as an absolute http(s) URL.
    #[error("base URL '{url}' is not a valid http(s) URL: {reason}")]
    InvalidBaseUrl {
        /// The offending value, after trimming.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Validated account credentials plus the service endpoint they belong to.
///
/// Construction is the only path in, so holders can rely on the base URL
/// being a well-formed http(s) URL with no trailing slash and on username
/// and password being non-empty.
#[derive(Clone)]
pub struct Credentials {
    base_url: String,
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Validate and construct credentials.
    ///
    /// The base URL is trimmed of surrounding whitespace and trailing
    /// slashes before being checked, so `https://aiprediction.us/` and
    /// `https://aiprediction.us` name the same endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Empty`] if any field is blank, or
    /// [`CredentialsError::InvalidBaseUrl`] if the base URL does not parse
    /// as an absolute http(s) URL.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let base_url = base_url.into();
        let username = username.into();
        let password = password.into();

        if base_url.trim().is_empty() {
            return Err(CredentialsError::Empty("base URL"));
        }
        if username.trim().is_empty() {
            return Err(CredentialsError::Empty("username"));
        }
        if password.trim().is_empty() {
            return Err(CredentialsError::Empty("password"));
        }

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| CredentialsError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CredentialsError::InvalidBaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(Self {
            base_url,
            username,
            password: SecretString::new(password.into()),
        })
    }

    /// The service endpoint, guaranteed free of a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The account password, still wrapped.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn accepts_valid_credentials() {
        let credentials = Credentials::new("https://aiprediction.us", "trader", "hunter2").unwrap();
        assert_eq!(credentials.base_url(), "https://aiprediction.us");
        assert_eq!(credentials.username(), "trader");
        assert_eq!(credentials.password().expose_secret(), "hunter2");
    }

    #[test]
    fn trims_trailing_slashes_and_whitespace_from_base_url() {
        let credentials = Credentials::new(" https://aiprediction.us// ", "trader", "pw").unwrap();
        assert_eq!(credentials.base_url(), "https://aiprediction.us");
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            Credentials::new("", "trader", "pw").unwrap_err(),
            CredentialsError::Empty("base URL")
        );
        assert_eq!(
            Credentials::new("https://aiprediction.us", "  ", "pw").unwrap_err(),
            CredentialsError::Empty("username")
        );
        assert_eq!(
            Credentials::new("https://aiprediction.us", "trader", "").unwrap_err(),
            CredentialsError::Empty("password")
        );
    }

    #[test]
    fn rejects_malformed_and_non_http_urls() {
        assert!(matches!(
            Credentials::new("not a url", "trader", "pw"),
            Err(CredentialsError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Credentials::new("ftp://aiprediction.us", "trader", "pw"),
            Err(CredentialsError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let credentials =
            Credentials::new("https://aiprediction.us", "trader", "super-secret").unwrap();
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }
}
