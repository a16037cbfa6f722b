pub mod discord;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::app::Result;
use crate::config::EMBED_COLOR;
use crate::domain::FeedEntry;

pub use discord::DiscordClient;

/// Discord rejects embed titles longer than this.
pub const MAX_TITLE_CHARS: usize = 256;

/// The bot account the publisher is logged in as.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

/// One chat message announcing a feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Embed {
    pub fn from_entry(entry: &FeedEntry) -> Self {
        Self {
            title: truncate_chars(entry.display_title(), MAX_TITLE_CHARS),
            url: entry.link.clone().filter(|link| !link.is_empty()),
            color: EMBED_COLOR,
            image: entry.image_url().map(|url| EmbedImage {
                url: url.to_string(),
            }),
            timestamp: entry.published.map(format_timestamp),
        }
    }
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Outbound chat channel.
#[async_trait]
pub trait Publisher {
    /// Who the publisher is authenticated as.
    async fn current_user(&self) -> Result<BotUser>;

    /// Fails with `ChannelUnavailable` when the target channel cannot be used.
    async fn ensure_channel(&self) -> Result<()>;

    async fn send(&self, embed: &Embed) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Media;
    use chrono::TimeZone;

    #[test]
    fn test_embed_from_full_entry() {
        let entry = FeedEntry {
            title: Some("Rematch sells one million copies".into()),
            link: Some("https://example.com/rematch".into()),
            published: Some(Utc.with_ymd_and_hms(2025, 6, 23, 12, 36, 10).unwrap()),
            media: vec![Media::new("https://cdn.example.com/rematch.png", "image/png")],
            ..Default::default()
        };

        let embed = Embed::from_entry(&entry);
        assert_eq!(embed.title, "Rematch sells one million copies");
        assert_eq!(embed.url.as_deref(), Some("https://example.com/rematch"));
        assert_eq!(embed.color, 0x0099ff);
        assert_eq!(
            embed.image,
            Some(EmbedImage {
                url: "https://cdn.example.com/rematch.png".into()
            })
        );
        assert_eq!(embed.timestamp.as_deref(), Some("2025-06-23T12:36:10.000Z"));
    }

    #[test]
    fn test_embed_defaults() {
        let embed = Embed::from_entry(&FeedEntry::default());
        assert_eq!(embed.title, "No Title");
        assert_eq!(embed.url, None);
        assert_eq!(embed.image, None);
        assert_eq!(embed.timestamp, None);
    }

    #[test]
    fn test_embed_serialization_omits_absent_fields() {
        let embed = Embed::from_entry(&FeedEntry {
            title: Some("Plain".into()),
            link: Some(String::new()),
            ..Default::default()
        });

        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Plain", "color": 0x0099ff }));
    }

    #[test]
    fn test_long_titles_truncated_on_char_boundary() {
        let title = "ทีมงาน".repeat(100);
        let embed = Embed::from_entry(&FeedEntry {
            title: Some(title),
            ..Default::default()
        });
        assert_eq!(embed.title.chars().count(), MAX_TITLE_CHARS);
    }
}
