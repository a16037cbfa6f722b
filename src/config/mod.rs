//! Runtime configuration for the courier.
//!
//! Configuration comes from the process environment. A `.env` file in the
//! working directory is loaded first when present, so local runs can keep the
//! bot token out of the shell history.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Feed polled when `RSS_FEED_URL` is not set.
pub const DEFAULT_FEED_URL: &str = "https://rss.app/feeds/COiTZRnT26oDqrJf.xml";

/// Watermark file used when `RSS_STATE_FILE` is not set (relative to cwd).
pub const DEFAULT_STATE_FILE: &str = "last_processed_guid.json";

/// Time between the end of one check and the start of the next.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Delay between two consecutive messages of the same batch.
pub const PACING_DELAY: Duration = Duration::from_millis(3000);

/// Accent color of every embed.
pub const EMBED_COLOR: u32 = 0x0099ff;

pub const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
pub const CHANNEL_ID_VAR: &str = "DISCORD_CHANNEL_ID";
pub const FEED_URL_VAR: &str = "RSS_FEED_URL";
pub const STATE_FILE_VAR: &str = "RSS_STATE_FILE";

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub channel_id: String,
    pub feed_url: String,
    pub state_file: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("feed_url", &self.feed_url)
            .field("state_file", &self.state_file)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment (and `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case in production.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get(BOT_TOKEN_VAR).ok_or(ConfigError::Missing(BOT_TOKEN_VAR))?;

        let channel_id = get(CHANNEL_ID_VAR).ok_or(ConfigError::Missing(CHANNEL_ID_VAR))?;
        if !channel_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidChannelId(channel_id));
        }

        let feed_url = get(FEED_URL_VAR).unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        Url::parse(&feed_url).map_err(|source| ConfigError::InvalidFeedUrl {
            url: feed_url.clone(),
            source,
        })?;

        let state_file = get(STATE_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        Ok(Self {
            bot_token,
            channel_id,
            feed_url,
            state_file,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("DISCORD_CHANNEL_ID must be a numeric channel id, got {0:?}")]
    InvalidChannelId(String),

    #[error("RSS_FEED_URL is not a valid URL ({url}): {source}")]
    InvalidFeedUrl {
        url: String,
        source: url::ParseError,
    },
}
