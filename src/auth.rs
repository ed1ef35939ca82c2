use std::time::Duration;

use crate::config::{Credentials, ScraperConfig};
use crate::error::{Result, ScrapeError};
use crate::fetcher::PageFetcher;
use crate::login_page::LoginPage;
use crate::session::Session;

const FORM_ID: &str = "user_login";
const FORM_OP: &str = "log_in";

/// Logs into the league site and hands back the authenticated [`Session`].
pub struct SessionAuthenticator<'a> {
    config: &'a ScraperConfig,
    fetcher: &'a dyn PageFetcher,
}

impl<'a> SessionAuthenticator<'a> {
    pub fn new(config: &'a ScraperConfig, fetcher: &'a dyn PageFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Fetches the login form, round-trips its `form_build_id` token and posts
    /// the credentials. Success is judged by the answer's content and the
    /// session cookie in the jar, not by the POST's status code.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;

        let login_url = self.config.login_url()?;
        let session = Session::new(Duration::from_secs(self.config.timeout_secs))?;

        log::info!("Logging in to {} as {}", login_url, credentials.username);

        let login_html = self.fetcher.get(&session, &login_url).await?;
        let form_build_id = LoginPage::parse(&login_html)
            .form_build_id
            .ok_or_else(|| ScrapeError::auth_failure("login page has no form_build_id token"))?;

        let fields = [
            ("name", credentials.username.as_str()),
            ("pass", credentials.password.as_str()),
            ("form_build_id", form_build_id.as_str()),
            ("form_id", FORM_ID),
            ("op", FORM_OP),
        ];
        let response = self.fetcher.post_form(&session, &login_url, &fields).await?;
        log::debug!("Login form answered {}", response.status);

        if let Some(reason) = LoginPage::parse(&response.body).rejected_reason() {
            return Err(ScrapeError::auth_failure(reason));
        }

        let site_url = self.config.site_url()?;
        if !session.has_cookie_containing(&site_url, &self.config.session_cookie_marker) {
            return Err(ScrapeError::auth_failure(format!(
                "no {}* session cookie after login (status {})",
                self.config.session_cookie_marker, response.status
            )));
        }

        log::info!("Logged in as {}", credentials.username);
        Ok(session)
    }
}
