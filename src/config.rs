// Application configuration, loaded from environment variables and CLI flags.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.tapsim.gg/api/tapsim";
pub const DEFAULT_CLICK_EMOJI: &str = "<:ClickIcon:1467297249103974683>";
pub const DEFAULT_TOKEN_EMOJI: &str = "<:token:1467296721502736384>";

/// Longest accepted hatch post interval: one week.
pub const MAX_POST_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Tap Sim API, without trailing slash.
    pub api_base: String,
    /// Port to bind the HTTP command endpoint to.
    pub port: u16,
    /// Minutes between automatic hatch leaderboard checks.
    pub post_interval_minutes: u64,
    /// Webhook that receives the automatic hatch post.
    /// When unset, posts are only logged.
    pub hatches_webhook_url: Option<String>,
    pub click_emoji: String,
    pub token_emoji: String,
    /// Per-attempt timeout for upstream requests.
    pub fetch_timeout: Duration,
    /// Base delay before the single retry of a failed upstream request.
    pub retry_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            port: 3000,
            post_interval_minutes: 5,
            hatches_webhook_url: None,
            click_emoji: DEFAULT_CLICK_EMOJI.to_string(),
            token_emoji: DEFAULT_TOKEN_EMOJI.to_string(),
            fetch_timeout: Duration::from_secs(10),
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `TAPSIM_API_BASE` - API base URL (default: `https://api.tapsim.gg/api/tapsim`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `POST_INTERVAL_MINUTES` - Hatch post interval (default: 5)
    /// - `HATCHES_WEBHOOK_URL` - Destination for automatic hatch posts
    /// - `CLICK_EMOJI` / `TOKEN_EMOJI` - Emoji markup used in replies
    /// - `FETCH_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    /// - `RETRY_BACKOFF_MS` - Delay before retrying a failed request (default: 500)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    /// - `--interval <MINUTES>` - Override the post interval
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Build a config from CLI arguments and an environment lookup.
    /// CLI flags take precedence over the environment, which takes
    /// precedence over defaults.
    pub fn from_sources<F>(args: &[String], env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_base = env("TAPSIM_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base);

        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(defaults.port);

        // Zero or overly long intervals would make tokio's interval panic.
        let post_interval_minutes = Self::parse_cli_value(args, "--interval")
            .and_then(|v| v.parse().ok())
            .or_else(|| env("POST_INTERVAL_MINUTES").and_then(|v| v.parse().ok()))
            .filter(|m: &u64| (1..=MAX_POST_INTERVAL_MINUTES).contains(m))
            .unwrap_or(defaults.post_interval_minutes);

        let hatches_webhook_url = env("HATCHES_WEBHOOK_URL").filter(|v| !v.trim().is_empty());

        let click_emoji = env("CLICK_EMOJI").unwrap_or(defaults.click_emoji);
        let token_emoji = env("TOKEN_EMOJI").unwrap_or(defaults.token_emoji);

        let fetch_timeout = env("FETCH_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|s: &u64| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let retry_backoff = env("RETRY_BACKOFF_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_backoff);

        Config {
            api_base,
            port,
            post_interval_minutes,
            hatches_webhook_url,
            click_emoji,
            token_emoji,
            fetch_timeout,
            retry_backoff,
        }
    }

    pub fn post_interval(&self) -> Duration {
        Duration::from_secs(self.post_interval_minutes.saturating_mul(60))
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}
