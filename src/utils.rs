use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Desktop browser user agents sent on every league-site request. The first
/// entry is the fixed agent used when rotation is turned off in the config.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
];

/// Picks the agent for one request when `rotate_user_agent` is set, so a
/// run's login, division and team requests do not all share one fingerprint.
pub fn get_random_user_agent() -> &'static str {
    USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())]
}

/// Fixed pause between team page requests
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay_ms: u64,
}

impl RateLimiter {
    /// A rate of zero (or less) turns the limiter off.
    pub fn new(requests_per_second: f64) -> Self {
        let delay_ms = if requests_per_second > 0.0 {
            (1000.0 / requests_per_second) as u64
        } else {
            0
        };
        Self { delay_ms }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub async fn wait(&self) {
        if self.delay_ms > 0 {
            sleep(self.delay()).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(2.0)
    }
}
