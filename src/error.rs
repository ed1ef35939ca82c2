//! Typed errors for the roster scrape.
//!
//! Authentication and transport errors abort a run. Parse gaps never show up
//! here: the page schemas degrade to empty values instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A credential is missing or empty; raised before any request is sent
    #[error("missing Zuluru credentials: {missing} is not set")]
    AuthConfig { missing: &'static str },

    /// Credentials were sent but the site did not hand back a session
    #[error("login rejected: {reason}")]
    AuthFailure { reason: String },

    /// Network, timeout or body-read failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer to a GET
    #[error("HTTP error {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("config error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn auth_failure(reason: impl Into<String>) -> Self {
        Self::AuthFailure {
            reason: reason.into(),
        }
    }

    /// True for every failure that came from talking to the remote site.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthConfig { .. } | Self::AuthFailure { .. })
    }
}

impl From<url::ParseError> for ScrapeError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let missing = ScrapeError::AuthConfig { missing: "ZULURU_USER" };
        assert!(missing.is_auth());
        assert!(!missing.is_transport());
        assert_eq!(
            missing.to_string(),
            "missing Zuluru credentials: ZULURU_USER is not set"
        );

        let status = ScrapeError::HttpStatus {
            url: "http://example.com".to_string(),
            status: 503,
        };
        assert!(status.is_transport());
        assert!(!status.is_auth());

        assert!(ScrapeError::auth_failure("no cookie").is_auth());
    }
}
