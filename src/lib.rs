// Roster Scraper Library
//
// Logs into a Zuluru league site, discovers a division's teams and turns each
// team page into a typed roster, keyed by team name.

pub mod auth;
pub mod config;
pub mod division_page;
pub mod error;
pub mod fetcher;
pub mod login_page;
pub mod pipeline;
pub mod session;
pub mod team_page;
pub mod utils;

// Re-export main types for convenience
pub use auth::SessionAuthenticator;
pub use config::{Credentials, ScraperConfig};
pub use division_page::{list_team_ids, TeamId};
pub use error::{Result, ScrapeError};
pub use fetcher::{FormResponse, HttpFetcher, PageFetcher};
pub use login_page::LoginPage;
pub use pipeline::{RosterIndex, RosterPipeline};
pub use session::Session;
pub use team_page::{parse_team, Gender, Player, Roster};
pub use utils::{get_random_user_agent, RateLimiter, USER_AGENTS};
