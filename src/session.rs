use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{Result, ScrapeError};

/// Authentication state for one pipeline run.
///
/// Wraps a private cookie jar and an HTTP client bound to it. Every fetch
/// takes the session explicitly, so independent runs never share cookies.
#[derive(Clone)]
pub struct Session {
    jar: Arc<Jar>,
    client: reqwest::Client,
}

impl Session {
    pub fn new(timeout: Duration) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { jar, client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Stores a raw `Set-Cookie` value as if `url` had sent it.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        self.jar.add_cookie_str(cookie, url);
    }

    /// The `Cookie` header this session would send to `url`.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    pub fn cookie_names(&self, url: &Url) -> Vec<String> {
        self.cookie_header(url)
            .map(|header| {
                header
                    .split(';')
                    .filter_map(|pair| pair.split('=').next())
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_cookie_containing(&self, url: &Url, marker: &str) -> bool {
        self.cookie_names(url).iter().any(|name| name.contains(marker))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
