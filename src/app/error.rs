use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Discord API error ({status}): {message}")]
    Discord { status: u16, message: String },

    #[error("Channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CourierError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BOT_TOKEN_VAR;

    #[test]
    fn test_config_error_converts() {
        let err: CourierError = ConfigError::Missing(BOT_TOKEN_VAR).into();
        assert!(matches!(err, CourierError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: DISCORD_BOT_TOKEN is not set"
        );
    }
}
