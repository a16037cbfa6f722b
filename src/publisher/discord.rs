use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{CourierError, Result};
use crate::publisher::{BotUser, Embed, Publisher};

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/courier-rs/courier, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Longest rate-limit pause honored before giving up on a message.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    retry_after: Option<f64>,
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    embeds: [&'a Embed; 1],
}

/// Posts embeds to one Discord text channel through the REST API.
pub struct DiscordClient {
    client: Client,
    base_url: String,
    channel_id: String,
}

impl DiscordClient {
    pub fn new(token: &str, channel_id: &str) -> Result<Self> {
        Self::with_base_url(token, channel_id, DISCORD_API_BASE)
    }

    pub fn with_base_url(token: &str, channel_id: &str, base_url: &str) -> Result<Self> {
        Url::parse(base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bot {}", token))
            .map_err(|e| CourierError::Other(format!("Invalid bot token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_id: channel_id.to_string(),
        })
    }

    fn channel_url(&self) -> String {
        format!("{}/channels/{}", self.base_url, self.channel_id)
    }

    async fn post_message(&self, embed: &Embed) -> Result<Response> {
        let response = self
            .client
            .post(format!("{}/messages", self.channel_url()))
            .json(&CreateMessage { embeds: [embed] })
            .send()
            .await?;
        Ok(response)
    }
}

/// Status and human-readable message of a non-success response.
async fn error_message(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&text)
        .map(|e| e.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(text);

    (status, message)
}

async fn api_error(response: Response) -> CourierError {
    let (status, message) = error_message(response).await;
    CourierError::Discord { status, message }
}

#[async_trait]
impl Publisher for DiscordClient {
    async fn current_user(&self) -> Result<BotUser> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn ensure_channel(&self) -> Result<()> {
        let response = self.client.get(self.channel_url()).send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                let (_, message) = error_message(response).await;
                Err(CourierError::ChannelUnavailable(format!(
                    "{}: {}",
                    self.channel_id, message
                )))
            }
            _ => Err(api_error(response).await),
        }
    }

    async fn send(&self, embed: &Embed) -> Result<()> {
        let response = self.post_message(embed).await?;

        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            if !response.status().is_success() {
                return Err(api_error(response).await);
            }
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let retry_after = serde_json::from_str::<ApiError>(&text)
            .ok()
            .and_then(|e| e.retry_after)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(Duration::from_secs(1));

        if retry_after > MAX_RETRY_AFTER {
            return Err(CourierError::Discord {
                status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
                message: format!("rate limited for {:.1}s", retry_after.as_secs_f64()),
            });
        }

        tracing::warn!(
            retry_after_ms = retry_after.as_millis() as u64,
            "Rate limited by Discord, retrying once"
        );
        tokio::time::sleep(retry_after).await;

        let response = self.post_message(embed).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}
