use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::session::Session;
use crate::utils::{get_random_user_agent, USER_AGENTS};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Answer to a form submission. The status is informational only.
#[derive(Debug, Clone)]
pub struct FormResponse {
    pub status: u16,
    pub body: String,
}

/// Issues requests against the league site on behalf of a [`Session`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET an HTML page. Any non-2xx status is an error.
    async fn get(&self, session: &Session, url: &Url) -> Result<String>;

    /// POST a urlencoded form. Status codes are never turned into errors,
    /// since a rejected-looking answer may still carry the session cookie.
    async fn post_form(
        &self,
        session: &Session,
        url: &Url,
        fields: &[(&str, &str)],
    ) -> Result<FormResponse>;
}

/// [`PageFetcher`] backed by the session's reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    rotate_user_agent: bool,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            rotate_user_agent: config.rotate_user_agent,
        }
    }

    fn user_agent(&self) -> &'static str {
        if self.rotate_user_agent {
            get_random_user_agent()
        } else {
            USER_AGENTS[0]
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(&ScraperConfig::default())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, session: &Session, url: &Url) -> Result<String> {
        log::debug!("GET {}", url);

        let response = session
            .client()
            .get(url.clone())
            .header(USER_AGENT, self.user_agent())
            .header(ACCEPT, HTML_ACCEPT)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::transport(url.as_str(), e))
    }

    async fn post_form(
        &self,
        session: &Session,
        url: &Url,
        fields: &[(&str, &str)],
    ) -> Result<FormResponse> {
        log::debug!("POST {} ({} fields)", url, fields.len());

        let response = session
            .client()
            .post(url.clone())
            .header(USER_AGENT, self.user_agent())
            .header(ACCEPT, HTML_ACCEPT)
            .form(&fields.to_vec())
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url.as_str(), e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            log::warn!("Form POST to {} answered {}, checking session anyway", url, status);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::transport(url.as_str(), e))?;

        Ok(FormResponse { status, body })
    }
}

/// In-memory fetcher for unit tests: canned pages keyed by URL.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    pub struct ScriptedFetcher {
        pages: HashMap<String, String>,
        login_cookie: Option<String>,
        failing: Option<String>,
        login_body: String,
        delays: HashMap<String, Duration>,
        pub gets: Mutex<Vec<String>>,
        /// URLs in the order their responses were handed back
        pub answered: Mutex<Vec<String>>,
        pub posts: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        /// Cookie the login POST plants in the session jar.
        pub fn login_cookie(mut self, cookie: &str) -> Self {
            self.login_cookie = Some(cookie.to_string());
            self
        }

        /// Body returned by the login POST.
        pub fn login_body(mut self, html: &str) -> Self {
            self.login_body = html.to_string();
            self
        }

        /// Holds the GET of `url` back for `delay` before answering.
        pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }

        /// GETs of this URL answer 503.
        pub fn failing(mut self, url: &str) -> Self {
            self.failing = Some(url.to_string());
            self
        }

        pub fn get_count(&self) -> usize {
            self.gets.lock().unwrap().len()
        }

        pub fn post_count(&self) -> usize {
            self.posts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn get(&self, _session: &Session, url: &Url) -> Result<String> {
            self.gets.lock().unwrap().push(url.to_string());

            if let Some(delay) = self.delays.get(url.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            self.answered.lock().unwrap().push(url.to_string());

            if self.failing.as_deref() == Some(url.as_str()) {
                return Err(ScrapeError::HttpStatus {
                    url: url.to_string(),
                    status: 503,
                });
            }

            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| ScrapeError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }

        async fn post_form(
            &self,
            session: &Session,
            url: &Url,
            fields: &[(&str, &str)],
        ) -> Result<FormResponse> {
            self.posts.lock().unwrap().push(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );

            if let Some(cookie) = &self.login_cookie {
                session.add_cookie_str(cookie, url);
            }

            // Drupal answers a good login with a redirect; mimic a non-2xx here
            Ok(FormResponse {
                status: 302,
                body: self.login_body.clone(),
            })
        }
    }
}
