use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::pin::pin;

use crate::auth::SessionAuthenticator;
use crate::config::{Credentials, ScraperConfig};
use crate::division_page::{list_team_ids, TeamId};
use crate::error::Result;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::session::Session;
use crate::team_page::{parse_team, Roster};
use crate::utils::RateLimiter;

/// Rosters keyed by the team name printed on each team page.
///
/// Two teams with the same visible name share one key; the team discovered
/// later replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RosterIndex {
    teams: BTreeMap<String, Roster>,
}

impl RosterIndex {
    /// Inserts under `roster.team_name`, returning the roster it replaced.
    pub fn insert(&mut self, roster: Roster) -> Option<Roster> {
        self.teams.insert(roster.team_name.clone(), roster)
    }

    pub fn get(&self, team_name: &str) -> Option<&Roster> {
        self.teams.get(team_name)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Roster)> {
        self.teams.iter().map(|(name, roster)| (name.as_str(), roster))
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Reads the JSON written by [`RosterIndex::to_json`], restoring each
    /// roster's team name from its key.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let mut teams: BTreeMap<String, Roster> = serde_json::from_str(raw)?;
        for (name, roster) in teams.iter_mut() {
            roster.team_name = name.clone();
        }
        Ok(Self { teams })
    }
}

/// End-to-end scrape: log in, list the division's teams, then fetch and parse
/// every team page.
///
/// Team pages are fetched one at a time in discovery order unless
/// `max_concurrent_fetches` is raised. Either way rosters enter the index in
/// discovery order, so name collisions resolve identically. Any auth or
/// transport error aborts the run and no partial index is returned.
pub struct RosterPipeline<F: PageFetcher> {
    config: ScraperConfig,
    fetcher: F,
    rate_limiter: RateLimiter,
}

impl RosterPipeline<HttpFetcher> {
    pub fn with_http(config: ScraperConfig) -> Self {
        let fetcher = HttpFetcher::new(&config);
        Self::new(config, fetcher)
    }
}

impl<F: PageFetcher> RosterPipeline<F> {
    pub fn new(config: ScraperConfig, fetcher: F) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit);
        Self {
            config,
            fetcher,
            rate_limiter,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn run(&self, division_id: &str, credentials: &Credentials) -> Result<RosterIndex> {
        let session = self.authenticate(credentials).await?;
        let team_ids = self.discover(&session, division_id).await?;
        self.fetch_rosters(&session, &team_ids).await
    }

    /// Same as [`run`](Self::run) but skips discovery and fetches `team_ids`.
    pub async fn run_with_ids(
        &self,
        team_ids: &[TeamId],
        credentials: &Credentials,
    ) -> Result<RosterIndex> {
        let session = self.authenticate(credentials).await?;
        self.fetch_rosters(&session, team_ids).await
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        SessionAuthenticator::new(&self.config, &self.fetcher)
            .authenticate(credentials)
            .await
    }

    async fn discover(&self, session: &Session, division_id: &str) -> Result<Vec<TeamId>> {
        let url = self.config.division_url(division_id)?;
        log::info!("Listing teams of division {}", division_id);

        let html = self.fetcher.get(session, &url).await?;
        let team_ids = list_team_ids(&html, &self.config.team_id_prefix);

        log::info!("Found {} teams", team_ids.len());
        Ok(team_ids)
    }

    async fn fetch_team(
        &self,
        session: &Session,
        team_id: &str,
        position: usize,
        total: usize,
    ) -> Result<Roster> {
        let url = self.config.team_url(team_id)?;
        log::info!("[{}/{}] Fetching team {}", position, total, team_id);

        let html = self.fetcher.get(session, &url).await?;
        let roster = parse_team(&html);

        log::debug!(
            "Team {} ({:?}): {} players, {} male, {} female",
            team_id,
            roster.team_name,
            roster.players.len(),
            roster.male_players.len(),
            roster.female_players.len()
        );
        Ok(roster)
    }

    async fn fetch_rosters(&self, session: &Session, team_ids: &[TeamId]) -> Result<RosterIndex> {
        let mut index = RosterIndex::default();
        let total = team_ids.len();
        let concurrency = self.config.max_concurrent_fetches;

        if concurrency <= 1 {
            for (i, team_id) in team_ids.iter().enumerate() {
                if i > 0 {
                    self.rate_limiter.wait().await;
                }
                let roster = self.fetch_team(session, team_id, i + 1, total).await?;
                insert_in_order(&mut index, roster);
            }
        } else {
            // `buffered` yields in input order, whatever order the responses arrive in
            let mut rosters = pin!(
                stream::iter(team_ids.iter().enumerate())
                    .map(|(i, team_id)| self.fetch_team(session, team_id, i + 1, total))
                    .buffered(concurrency)
            );

            while let Some(roster) = rosters.next().await {
                insert_in_order(&mut index, roster?);
            }
        }

        log::info!("Scraped {} teams into {} roster entries", total, index.len());
        Ok(index)
    }
}

fn insert_in_order(index: &mut RosterIndex, roster: Roster) {
    let name = roster.team_name.clone();
    if index.insert(roster).is_some() {
        log::warn!("Team name {:?} appears twice, keeping the later roster", name);
    }
}
