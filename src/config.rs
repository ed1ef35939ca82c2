use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::{Result, ScrapeError};

pub const USER_ENV: &str = "ZULURU_USER";
pub const PASSWORD_ENV: &str = "ZULURU_PASSWORD";

/// Where the league site lives and how politely to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub login_url: String,
    pub base_url: String,
    /// Division scraped when the caller does not name one
    pub division_id: String,
    /// Stripped from each directory anchor's `id` to get the TeamId
    pub team_id_prefix: String,
    /// Substring of the session cookie name set by a successful login
    pub session_cookie_marker: String,
    pub timeout_secs: u64,
    /// Requests per second between team pages (0 = no delay)
    pub rate_limit: f64,
    /// 1 keeps team fetches strictly sequential
    pub max_concurrent_fetches: usize,
    pub rotate_user_agent: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            login_url: "http://www.ocua.ca/user/login".to_string(),
            base_url: "http://www.ocua.ca/zuluru".to_string(),
            division_id: "940".to_string(),
            team_id_prefix: "teams_team_".to_string(),
            session_cookie_marker: "SESS".to_string(),
            timeout_secs: 30,
            rate_limit: 2.0,
            max_concurrent_fetches: 1,
            rotate_user_agent: true,
        }
    }
}

impl ScraperConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    pub fn login_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.login_url)?)
    }

    /// Root of the league pages; the session cookie must be scoped to cover it.
    pub fn site_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    pub fn division_url(&self, division_id: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/divisions/view/division:{}",
            self.base_url.trim_end_matches('/'),
            division_id
        ))?)
    }

    pub fn team_url(&self, team_id: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/teams/view/team:{}",
            self.base_url.trim_end_matches('/'),
            team_id
        ))?)
    }
}

/// Login name and password for the league site.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `ZULURU_USER` / `ZULURU_PASSWORD`. Unset variables become empty
    /// strings so the failure surfaces from `validate` as `AuthConfig`.
    pub fn from_env() -> Self {
        Self {
            username: std::env::var(USER_ENV).unwrap_or_default(),
            password: std::env::var(PASSWORD_ENV).unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(ScrapeError::AuthConfig { missing: USER_ENV });
        }
        if self.password.is_empty() {
            return Err(ScrapeError::AuthConfig {
                missing: PASSWORD_ENV,
            });
        }
        Ok(())
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
